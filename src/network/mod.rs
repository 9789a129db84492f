//! Two-layer sigmoid/softmax network
//!
//! - `params`: flat parameter vector codec (`unpack` / `pack`)
//! - `two_layer`: forward pass, cross-entropy cost and backpropagation

pub mod params;
pub mod two_layer;

pub use params::{pack, unpack, Dimensions, Parameters};
pub use two_layer::{cross_entropy, forward, forward_backward, Activations};
