use super::TokenGenerator;
use uuid::Uuid;

/// Random v4 UUID tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidTokenGenerator;

impl TokenGenerator for UuidTokenGenerator {
    fn new_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
