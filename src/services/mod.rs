pub mod ai;
pub mod password;

pub use ai::AiClient;
pub use password::PasswordHasher;
