pub mod check;
pub mod env_boot;
pub mod error;
pub mod settings;
pub mod tracing;

pub mod util {
    pub mod env;
}
