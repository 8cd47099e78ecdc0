//! Application layer: the payment facade and the outcome resolver.
//!
//! `PaymentFacade` is the public entry point. It resolves a provider module, builds the
//! request, hands it to a transport and, for approvals, lets `OutcomeResolver` turn the
//! exchange into a typed `PaymentResult`.

pub mod facade;
pub mod outcome;
