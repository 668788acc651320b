//! # charcrf Core
//!
//! Character-level word features for CRF sequence taggers. A character LSTM
//! reads each word's character matrix and summarizes it as the final hidden
//! state of every layer and direction, capturing casing, affixes and shape
//! for words the word-level vocabulary has never seen.
//!
//! ## Quick Start
//!
//! ```rust
//! use candle_core::{DType, Device, Tensor};
//! use candle_nn::{VarBuilder, VarMap};
//! use charcrf_core::{CharLstm, CharLstmConfig};
//!
//! let varmap = VarMap::new();
//! let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
//! let encoder = CharLstm::new(&CharLstmConfig::new(5, 3), vb).unwrap();
//!
//! let words = vec![
//!     Tensor::ones((4, 5), DType::F32, &Device::Cpu).unwrap(),
//!     Tensor::ones((1, 5), DType::F32, &Device::Cpu).unwrap(),
//! ];
//! let features = encoder.encode(&words).unwrap();
//!
//! assert_eq!(encoder.output_size(), 6);
//! assert_eq!(features.dims(), &[2, 6]);
//! ```
pub mod encoder;
pub mod error;

// Re-export primary API
pub use encoder::{CharLstm, CharLstmConfig, LstmFinalState, StackedLstm};
pub use error::{CharCrfError, Result};
