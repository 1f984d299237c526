// SPDX-License-Identifier: BUSL-1.1

//! Device port configuration selection (spec §4.G).

mod selector;
mod tester;

pub use selector::DpcSelector;
pub use tester::{PortTester, TestDoubleTester};
