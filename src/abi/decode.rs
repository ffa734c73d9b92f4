use alloy_primitives::{Address, B256, U256};

use super::{EventSchema, ParamType};

/// A decoded parameter value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint(U256),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    pub name: &'static str,
    pub values: Vec<(&'static str, Token)>,
}

impl DecodedEvent {
    fn value(&self, name: &str) -> Option<&Token> {
        self.values
            .iter()
            .find(|(param, _)| *param == name)
            .map(|(_, token)| token)
    }

    pub fn address(&self, name: &str) -> Option<Address> {
        match self.value(name)? {
            Token::Address(address) => Some(*address),
            _ => None,
        }
    }

    pub fn uint(&self, name: &str) -> Option<U256> {
        match self.value(name)? {
            Token::Uint(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Topic count or topic[0] does not belong to the schema
    TopicMismatch { event: &'static str },
    PayloadTooShort {
        event: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Payload length is not a multiple of 32
    Misaligned { event: &'static str, len: usize },
    /// An address word has non-zero bytes above the low 20
    DirtyAddress {
        event: &'static str,
        param: &'static str,
    },
    MissingParam {
        event: &'static str,
        param: &'static str,
    },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::TopicMismatch { event } => {
                write!(f, "Log topics do not match event {}", event)
            }
            DecodeError::PayloadTooShort {
                event,
                expected,
                actual,
            } => write!(
                f,
                "{} payload too short: expected at least {} bytes, got {}",
                event, expected, actual
            ),
            DecodeError::Misaligned { event, len } => write!(
                f,
                "{} payload length {} is not a multiple of 32",
                event, len
            ),
            DecodeError::DirtyAddress { event, param } => write!(
                f,
                "{} parameter {} is not a valid padded address",
                event, param
            ),
            DecodeError::MissingParam { event, param } => {
                write!(f, "{} has no parameter {}", event, param)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl EventSchema {
    /// True when the log has this event's signature topic and topic count
    pub fn matches(&self, topics: &[B256]) -> bool {
        topics.len() == self.topic_count() && topics.first() == Some(&self.selector())
    }

    /// Decodes a log's topics and payload into named values
    pub fn decode(&self, topics: &[B256], data: &[u8]) -> Result<DecodedEvent, DecodeError> {
        if !self.matches(topics) {
            return Err(DecodeError::TopicMismatch { event: self.name });
        }

        let expected = self.data_len();
        if data.len() < expected {
            return Err(DecodeError::PayloadTooShort {
                event: self.name,
                expected,
                actual: data.len(),
            });
        }
        if data.len() % 32 != 0 {
            return Err(DecodeError::Misaligned {
                event: self.name,
                len: data.len(),
            });
        }

        let mut indexed = topics[1..].iter();
        let mut words = data.chunks_exact(32).map(B256::from_slice);
        let mut values = Vec::with_capacity(self.params.len());

        for param in &self.params {
            let next = if param.indexed {
                indexed.next().copied()
            } else {
                words.next()
            };
            // Lengths were checked above, so this only fires on an inconsistent schema.
            let word = next.ok_or(DecodeError::TopicMismatch { event: self.name })?;

            let token = match param.kind {
                ParamType::Address => {
                    if word[..12].iter().any(|b| *b != 0) {
                        return Err(DecodeError::DirtyAddress {
                            event: self.name,
                            param: param.name,
                        });
                    }
                    Token::Address(Address::from_word(word))
                }
                ParamType::Uint256 => Token::Uint(U256::from_be_bytes(word.0)),
            };
            values.push((param.name, token));
        }

        Ok(DecodedEvent {
            name: self.name,
            values,
        })
    }
}
