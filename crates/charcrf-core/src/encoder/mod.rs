pub mod char_lstm;
pub mod config;
pub mod recurrent;

pub use char_lstm::CharLstm;
pub use config::CharLstmConfig;
pub use recurrent::{LstmFinalState, StackedLstm};
