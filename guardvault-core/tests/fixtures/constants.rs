#![allow(dead_code)]

use guardvault_core::foundation::Address;

pub const TEST_VAULT: Address = Address::repeat_byte(0x01);
pub const TEST_OTHER_VAULT: Address = Address::repeat_byte(0x02);
pub const TEST_TOKEN: Address = Address::repeat_byte(0x11);
pub const TEST_CREATOR: Address = Address::repeat_byte(0x5A);
pub const TEST_RECIPIENT: Address = Address::repeat_byte(0xAA);
pub const TEST_TOKEN_CONTRACT: Address = Address::repeat_byte(0xEE);

pub const TEST_AMOUNT: u64 = 1000;
pub const TEST_NONCE: u64 = 5;
pub const TEST_QUORUM: u32 = 2;
