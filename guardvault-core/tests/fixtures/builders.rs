#![allow(dead_code)]

use crate::fixtures::{TEST_AMOUNT, TEST_NONCE, TEST_RECIPIENT, TEST_TOKEN};
use guardvault_core::domain::WithdrawalRequest;
use guardvault_core::foundation::{Address, U256};

pub struct WithdrawalRequestBuilder {
    token: Address,
    amount: U256,
    recipient: Address,
    nonce: U256,
    reason: String,
}

impl Default for WithdrawalRequestBuilder {
    fn default() -> Self {
        Self {
            token: TEST_TOKEN,
            amount: U256::from(TEST_AMOUNT),
            recipient: TEST_RECIPIENT,
            nonce: U256::from(TEST_NONCE),
            reason: "school fees".to_string(),
        }
    }
}

impl WithdrawalRequestBuilder {
    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = U256::from(amount);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = U256::from(nonce);
        self
    }

    pub fn recipient(mut self, recipient: Address) -> Self {
        self.recipient = recipient;
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    pub fn build(self) -> WithdrawalRequest {
        WithdrawalRequest { token: self.token, amount: self.amount, recipient: self.recipient, nonce: self.nonce, reason: self.reason }
    }
}

pub fn sample_request() -> WithdrawalRequest {
    WithdrawalRequestBuilder::default().build()
}
