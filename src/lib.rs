pub mod clock;
pub mod error;
pub mod logging;

pub mod commands {
    pub mod preify;
}
