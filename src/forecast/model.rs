//! Recurrent sequence-to-vector forecaster
//!
//! One LSTM layer over a window of single-valued time steps, optionally
//! run in both directions with the two final hidden states concatenated,
//! then dropout and a linear projection to `output_size` scalars. The
//! output is the direct multi-step forecast in scaled units; recursion
//! across days happens in the roller, not here.

use crate::config::ModelConfig;
use crate::error::{ForecastError, Result};
use candle_core::Tensor;
use candle_nn::rnn::{lstm, LSTMConfig, LSTM, RNN};
use candle_nn::{linear, Dropout, Linear, Module, VarBuilder};

/// Per-feature sequence regression model, request-scoped
#[derive(Debug)]
pub struct SequenceForecaster {
    forward_lstm: LSTM,
    backward_lstm: Option<LSTM>,
    dropout: Dropout,
    fc: Linear,
}

impl SequenceForecaster {
    /// Build an untrained forecaster with weights registered in `vb`
    pub fn new(config: &ModelConfig, output_size: usize, vb: VarBuilder) -> Result<Self> {
        let input_size = 1;
        let forward_lstm = lstm(
            input_size,
            config.hidden_size,
            LSTMConfig::default(),
            vb.pp("lstm_fwd"),
        )?;
        let backward_lstm = if config.bidirectional {
            Some(lstm(
                input_size,
                config.hidden_size,
                LSTMConfig::default(),
                vb.pp("lstm_bwd"),
            )?)
        } else {
            None
        };

        let directions = if config.bidirectional { 2 } else { 1 };
        let fc = linear(config.hidden_size * directions, output_size, vb.pp("fc"))?;

        Ok(Self {
            forward_lstm,
            backward_lstm,
            dropout: Dropout::new(config.dropout),
            fc,
        })
    }

    /// Forward pass.
    ///
    /// `x` has shape `(batch, seq_len, 1)`; the result has shape
    /// `(batch, output_size)`. Dropout only applies when `train` is set,
    /// so inference is deterministic.
    pub fn forward(&self, x: &Tensor, train: bool) -> Result<Tensor> {
        let mut hidden = self.final_state(&self.forward_lstm, x)?;

        if let Some(backward) = &self.backward_lstm {
            let reversed = reverse_time(x)?;
            let back_hidden = self.final_state(backward, &reversed)?;
            hidden = Tensor::cat(&[hidden, back_hidden], 1)?;
        }

        let hidden = self.dropout.forward(&hidden, train)?;
        Ok(self.fc.forward(&hidden)?)
    }

    /// Run one direction over the sequence and keep the final hidden state
    fn final_state(&self, lstm: &LSTM, x: &Tensor) -> Result<Tensor> {
        let states = lstm.seq(x)?;
        let last = states
            .last()
            .ok_or_else(|| ForecastError::Internal("empty input sequence".to_string()))?;
        Ok(last.h().clone())
    }
}

/// Reverse a `(batch, seq_len, features)` tensor along the time axis
fn reverse_time(x: &Tensor) -> Result<Tensor> {
    let seq_len = x.dim(1)?;
    let indices: Vec<u32> = (0..seq_len as u32).rev().collect();
    let indices = Tensor::from_vec(indices, seq_len, x.device())?;
    Ok(x.index_select(&indices, 1)?)
}
