//! # Stacked LSTM
//!
//! Multi-layer, optionally bidirectional, batch-first LSTM built from
//! `candle_nn` cells. Parameter names follow the PyTorch `nn.LSTM` layout
//! (`weight_ih_l0`, `bias_hh_l1_reverse`, ...), so exported weights load as-is.

use candle_core::{DType, Device, Tensor};
use candle_nn::rnn::{Direction, LSTM, LSTMConfig, LSTMState, RNN};
use candle_nn::VarBuilder;

use crate::error::{CharCrfError, Result};

/// Final hidden and cell states, each `[(layers * directions) x batch x hidden_size]`.
///
/// Rows are ordered layer-major, then direction:
/// `l0 forward, l0 backward, l1 forward, l1 backward, ...`.
#[derive(Debug, Clone)]
pub struct LstmFinalState {
    /// Hidden state after the last step read by each cell.
    pub h: Tensor,
    /// Cell state after the last step read by each cell.
    pub c: Tensor,
}

/// One LSTM cell and the time direction it reads in.
#[derive(Debug, Clone)]
struct DirectionalCell {
    cell: LSTM,
    reverse: bool,
}

impl DirectionalCell {
    /// Run over `[batch x seq_len x features]`, returning per-step outputs
    /// aligned with the input time axis and the state after the last step read.
    fn run(&self, input: &Tensor) -> Result<(Tensor, LSTMState)> {
        let input = if self.reverse {
            reverse_time(input)?
        } else {
            input.clone()
        };

        let states = self.cell.seq(&input)?;
        let last = states
            .last()
            .cloned()
            .ok_or(CharCrfError::EmptyWord { index: 0 })?;

        let output = self.cell.states_to_tensor(&states)?;
        let output = if self.reverse {
            reverse_time(&output)?
        } else {
            output
        };

        Ok((output, last))
    }
}

/// Reverse the time axis (dim 1) of a batch-first tensor.
fn reverse_time(xs: &Tensor) -> Result<Tensor> {
    let seq_len = xs.dim(1)?;
    let ids: Vec<u32> = (0..seq_len as u32).rev().collect();
    let ids = Tensor::new(ids.as_slice(), xs.device())?;
    Ok(xs.index_select(&ids, 1)?)
}

/// Stacked LSTM over batch-first sequences.
#[derive(Debug, Clone)]
pub struct StackedLstm {
    layers: Vec<Vec<DirectionalCell>>,
    hidden_size: usize,
    dropout: f32,
    device: Device,
    dtype: DType,
}

impl StackedLstm {
    /// Build `layers * directions` cells under `vb`.
    ///
    /// Layer 0 reads `in_dim` features; deeper layers read the concatenated
    /// per-step outputs of every direction of the layer below.
    pub fn new(
        in_dim: usize,
        hidden_size: usize,
        layers: usize,
        bidirectional: bool,
        dropout: f32,
        vb: VarBuilder,
    ) -> Result<Self> {
        if in_dim == 0 || hidden_size == 0 {
            return Err(CharCrfError::InvalidConfiguration(format!(
                "input and hidden widths must be positive, got {in_dim} and {hidden_size}"
            )));
        }
        if layers == 0 {
            return Err(CharCrfError::InvalidConfiguration(
                "layers must be at least 1".into(),
            ));
        }
        if !(0.0..1.0).contains(&dropout) {
            return Err(CharCrfError::InvalidConfiguration(format!(
                "dropout must be in [0, 1), got {dropout}"
            )));
        }

        let directions: &[bool] = if bidirectional { &[false, true] } else { &[false] };

        let mut stack = Vec::with_capacity(layers);
        for layer_idx in 0..layers {
            let layer_in = if layer_idx == 0 {
                in_dim
            } else {
                hidden_size * directions.len()
            };

            let mut cells = Vec::with_capacity(directions.len());
            for &reverse in directions {
                let config = LSTMConfig {
                    layer_idx,
                    direction: if reverse {
                        Direction::Backward
                    } else {
                        Direction::Forward
                    },
                    ..Default::default()
                };
                cells.push(DirectionalCell {
                    cell: candle_nn::rnn::lstm(layer_in, hidden_size, config, vb.clone())?,
                    reverse,
                });
            }
            stack.push(cells);
        }

        Ok(Self {
            layers: stack,
            hidden_size,
            dropout,
            device: vb.device().clone(),
            dtype: vb.dtype(),
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn num_directions(&self) -> usize {
        self.layers.first().map_or(0, Vec::len)
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Inference-mode forward pass.
    pub fn forward(&self, input: &Tensor) -> Result<(Tensor, LstmFinalState)> {
        self.forward_t(input, false)
    }

    /// Forward pass over `[batch x seq_len x features]`.
    ///
    /// Returns the last layer's per-step outputs
    /// `[batch x seq_len x (hidden_size * directions)]` and the final states.
    /// Dropout is applied between layers only when `train` is set.
    ///
    /// A zero-length sequence fails with `EmptyWord { index: 0 }`; the whole
    /// batch shares one length here, so the index is always 0 at this layer.
    pub fn forward_t(&self, input: &Tensor, train: bool) -> Result<(Tensor, LstmFinalState)> {
        let (_batch, seq_len, _features) = input.dims3()?;
        if seq_len == 0 {
            return Err(CharCrfError::EmptyWord { index: 0 });
        }

        let cells = self.layers.len() * self.num_directions();
        let mut h_n = Vec::with_capacity(cells);
        let mut c_n = Vec::with_capacity(cells);

        let mut layer_input = input.clone();
        for (layer_idx, layer) in self.layers.iter().enumerate() {
            let mut outputs = Vec::with_capacity(layer.len());
            for cell in layer {
                let (output, state) = cell.run(&layer_input)?;
                outputs.push(output);
                h_n.push(state.h().clone());
                c_n.push(state.c().clone());
            }

            let mut output = Tensor::cat(&outputs, 2)?;
            let is_last = layer_idx + 1 == self.layers.len();
            if train && !is_last && self.dropout > 0.0 {
                output = candle_nn::ops::dropout(&output, self.dropout)?;
            }
            layer_input = output;
        }

        let state = LstmFinalState {
            h: Tensor::stack(&h_n, 0)?,
            c: Tensor::stack(&c_n, 0)?,
        };
        Ok((layer_input, state))
    }
}
