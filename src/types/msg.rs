use alloy::primitives::{Address, U256};

/// Sender and attached native value of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msg {
    /// The caller.
    pub sender: Address,
    /// Native value sent with the call.
    pub value: U256,
}

impl Msg {
    /// A call from `sender` without value.
    pub const fn new(sender: Address) -> Self {
        Self { sender, value: U256::ZERO }
    }

    /// Sets the attached native value.
    pub const fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

impl From<Address> for Msg {
    fn from(sender: Address) -> Self {
        Self::new(sender)
    }
}
