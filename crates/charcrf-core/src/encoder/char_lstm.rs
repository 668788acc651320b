//! # Character LSTM
//!
//! Generates word features from the final hidden state of an LSTM run over
//! each word's characters. Words are encoded one at a time at batch size 1,
//! so no padding or masking is involved.

use candle_core::{Device, DType, Tensor};
use candle_nn::VarBuilder;
use tracing::{debug, trace};

use crate::encoder::config::CharLstmConfig;
use crate::encoder::recurrent::StackedLstm;
use crate::error::{CharCrfError, Result};

/// Character LSTM word encoder.
///
/// Each output row is the flattened final hidden state of one word, laid out
/// layer-major then direction:
///
/// ```text
/// [ l0 forward | l0 backward | l1 forward | l1 backward | ... ]
///   hidden_size  hidden_size   hidden_size  hidden_size
/// ```
///
/// Downstream taggers that slice features by position depend on this order.
#[derive(Debug, Clone)]
pub struct CharLstm {
    rnn: StackedLstm,
    config: CharLstmConfig,
    output_size: usize,
}

impl CharLstm {
    /// Build the encoder, reading or creating the LSTM parameters under
    /// `vb.pp("rnn")`.
    pub fn new(config: &CharLstmConfig, vb: VarBuilder) -> Result<Self> {
        config.validate()?;

        let rnn = StackedLstm::new(
            config.n_chars,
            config.hidden_size,
            config.layers,
            config.bidirectional,
            config.dropout,
            vb.pp("rnn"),
        )?;
        let output_size = config.output_size();

        debug!(
            n_chars = config.n_chars,
            hidden_size = config.hidden_size,
            layers = config.layers,
            bidirectional = config.bidirectional,
            dropout = config.dropout,
            output_size,
            "built character LSTM"
        );

        Ok(Self {
            rnn,
            config: config.clone(),
            output_size,
        })
    }

    pub fn config(&self) -> &CharLstmConfig {
        &self.config
    }

    pub fn n_chars(&self) -> usize {
        self.config.n_chars
    }

    pub fn hidden_size(&self) -> usize {
        self.rnn.hidden_size()
    }

    pub fn layers(&self) -> usize {
        self.rnn.num_layers()
    }

    pub fn num_directions(&self) -> usize {
        self.rnn.num_directions()
    }

    /// Width of each word feature row.
    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn device(&self) -> &Device {
        self.rnn.device()
    }

    pub fn dtype(&self) -> DType {
        self.rnn.dtype()
    }

    /// Encode words in inference mode.
    ///
    /// # Arguments
    /// * `words` - Tensors of shape `[word_length x n_chars]`
    ///
    /// # Returns
    /// A `[words.len() x output_size]` tensor; row `i` encodes `words[i]`.
    pub fn encode(&self, words: &[Tensor]) -> Result<Tensor> {
        self.encode_t(words, false)
    }

    /// Encode words, enabling inter-layer dropout when `train` is set.
    ///
    /// The whole call fails if any word is malformed; nothing is encoded
    /// until every word has been checked.
    pub fn encode_t(&self, words: &[Tensor], train: bool) -> Result<Tensor> {
        trace!(words = words.len(), train, "encoding words");
        self.check_words(words)?;

        if words.is_empty() {
            return Ok(Tensor::zeros(
                (0, self.output_size),
                self.dtype(),
                self.device(),
            )?);
        }

        let mut hiddens = Vec::with_capacity(words.len());
        for word in words {
            let word = word.to_device(self.device())?.to_dtype(self.dtype())?;

            let (_, state) = self.rnn.forward_t(&word.unsqueeze(0)?, train)?;
            // h: [(layers * directions) x 1 x hidden_size]

            let hidden = state.h.squeeze(1)?;
            // hidden: [(layers * directions) x hidden_size]

            hiddens.push(hidden.flatten_all()?);
        }

        Ok(Tensor::stack(&hiddens, 0)?)
    }

    fn check_words(&self, words: &[Tensor]) -> Result<()> {
        let n_chars = self.config.n_chars;
        for (index, word) in words.iter().enumerate() {
            match *word.dims() {
                [0, width] if width == n_chars => {
                    return Err(CharCrfError::EmptyWord { index });
                }
                [_, width] if width == n_chars => {}
                ref dims => {
                    return Err(CharCrfError::ShapeMismatch {
                        index,
                        expected: n_chars,
                        actual: dims.to_vec(),
                    });
                }
            }
        }
        Ok(())
    }
}
