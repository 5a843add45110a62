use crate::{Options, Payload};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Hand the payload and an options snapshot to the transport layer.
    Submit { payload: Payload, options: Options },
}
