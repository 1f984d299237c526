// SPDX-License-Identifier: BUSL-1.1

//! Typed publish/subscribe bus (spec §4.A): the sole inter-agent coupling
//! mechanism in the EVE coordination substrate.
//!
//! A topic is declared once, at [`Publication::new`]/[`Publication::new_persistent`]
//! construction, generic over its payload type `T: Publishable` — no
//! runtime type checks happen at publish time (spec §9).

mod backend;
mod error;
mod event;
mod identity;
mod publication;
mod shared;
mod subscription;

pub use backend::Backend;
pub use error::PubSubError;
pub use event::ChangeEvent;
pub use identity::TopicIdentity;
pub use publication::Publication;
pub use subscription::Subscription;
