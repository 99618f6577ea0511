//
//  cf-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the Cloud Controller and UAA
//!
//! This module provides the shared vocabulary of the API layer: the error
//! taxonomy, warning accumulation and the pagination engine.
//!
//! # Overview
//!
//! - [`CcError`] - Unified error type for all API operations
//! - [`Warnings`] - Ordered advisory strings collected from `X-Cf-Warnings`
//! - [`Warned`] - A result paired with the warnings gathered while producing it
//! - Pagination (re-exported from the [`pagination`] submodule)
//!
//! # Example
//!
//! ```rust
//! use cf_client::api::common::{CcError, Warned, Warnings};
//!
//! fn report<T>(outcome: Warned<T>) {
//!     for warning in outcome.warnings.iter() {
//!         eprintln!("warning: {}", warning);
//!     }
//!     match outcome.result {
//!         Ok(_) => println!("OK"),
//!         Err(CcError::ResourceNotFound(what)) => println!("not found: {}", what),
//!         Err(e) => println!("FAILED: {}", e),
//!     }
//! }
//! ```
//!
//! # Notes
//!
//! - Warnings are never errors and never abort a call
//! - Warnings are concatenated in call order and never deduplicated

mod error;
mod pagination;

pub use error::*;
pub use pagination::*;

/// Ordered advisory messages returned by the server alongside a response.
///
/// Every layer that performs more than one round trip appends the warnings
/// of each response in the order the calls were made.
///
/// # Example
///
/// ```rust
/// use cf_client::api::common::Warnings;
///
/// let mut warnings = Warnings::from(vec!["first".to_string()]);
/// warnings.extend(vec!["second".to_string(), "first".to_string()]);
///
/// assert_eq!(warnings.len(), 3);
/// assert_eq!(warnings.as_slice()[2], "first");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings(Vec<String>);

impl Warnings {
    /// Creates an empty warning list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single warning.
    pub fn push(&mut self, warning: impl Into<String>) {
        self.0.push(warning.into());
    }

    /// Appends every warning from `other`, preserving order.
    pub fn extend<I>(&mut self, other: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.0.extend(other);
    }

    /// Moves the warnings out of a [`Warned`] result and returns its inner
    /// result.
    ///
    /// This is the composition primitive used by actors: warnings are kept
    /// whether or not the call succeeded, and `?` then propagates the error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cf_client::api::common::{CcError, Warned, Warnings};
    ///
    /// let mut all = Warnings::new();
    /// let value: Result<i32, CcError> = all.absorb(Warned::ok(7, Warnings::from(vec!["w".to_string()])));
    ///
    /// assert_eq!(value.unwrap(), 7);
    /// assert_eq!(all.len(), 1);
    /// ```
    pub fn absorb<T, E>(&mut self, outcome: Warned<T, E>) -> std::result::Result<T, E> {
        self.0.extend(outcome.warnings.0);
        outcome.result
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Warnings {
    fn from(warnings: Vec<String>) -> Self {
        Self(warnings)
    }
}

impl IntoIterator for Warnings {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The outcome of an API call together with the warnings it produced.
///
/// Warnings survive failures: a pagination run that fails on page two still
/// reports the warnings from pages one and two.
///
/// # Type Parameters
///
/// - `T` - The success value
/// - `E` - The error type, [`CcError`] for the API layer
#[derive(Debug)]
pub struct Warned<T, E = CcError> {
    /// The call's result
    pub result: std::result::Result<T, E>,
    /// Warnings collected while producing `result`
    pub warnings: Warnings,
}

impl<T, E> Warned<T, E> {
    /// Creates a successful outcome.
    pub fn ok(value: T, warnings: Warnings) -> Self {
        Self {
            result: Ok(value),
            warnings,
        }
    }

    /// Creates a failed outcome that still carries its warnings.
    pub fn err(error: E, warnings: Warnings) -> Self {
        Self {
            result: Err(error),
            warnings,
        }
    }

    /// Pairs a result with warnings.
    pub fn new(result: std::result::Result<T, E>, warnings: Warnings) -> Self {
        Self { result, warnings }
    }

    /// Maps the success value, keeping the warnings.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Warned<U, E> {
        Warned {
            result: self.result.map(f),
            warnings: self.warnings,
        }
    }

    /// Converts the error type, keeping the warnings.
    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Warned<T, F> {
        Warned {
            result: self.result.map_err(f),
            warnings: self.warnings,
        }
    }

    /// Splits into `(result, warnings)`.
    pub fn into_parts(self) -> (std::result::Result<T, E>, Warnings) {
        (self.result, self.warnings)
    }
}
