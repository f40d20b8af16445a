/*!
# Unified Error Type

This module provides a single error enum for every failure mode the pipeline
can surface, from malformed input files through to a Hierholzer trail that
loses track of an edge. Keeping one enum (rather than one type per stage)
means the orchestrator can bubble any stage's error straight to the caller
without a wrapper type per stage.
*/

use std::error::Error;
use std::fmt;

/// Unified error type for all `postman` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostmanError {
    /// An edge had a negative endpoint or a non-positive weight.
    InvalidEdge(String),

    /// A data line could not be parsed.
    MalformedInput(String),

    /// The input multigraph (after alias collapse) is not connected.
    Disconnected(String),

    /// Two alias maps disagreed on a shared key during `merge`.
    ConflictingAlias(String),

    /// Blossom could not match every original vertex on a complete graph.
    NoPerfectMatching(String),

    /// The Eulerization post-condition was violated.
    EulerizationFailed(String),

    /// Hierholzer could not find a continuing edge.
    NoRoute(String),

    /// A heap operation was attempted on an empty heap.
    EmptyHeap,

    /// `insert` was called with a satellite already present in the heap.
    DuplicateSatellite(u64),

    /// I/O error while reading a graph description or list file.
    IoError(String),
}

impl PostmanError {
    pub fn invalid_edge(message: impl Into<String>) -> Self {
        PostmanError::InvalidEdge(message.into())
    }

    pub fn malformed_input(message: impl Into<String>) -> Self {
        PostmanError::MalformedInput(message.into())
    }

    pub fn disconnected(message: impl Into<String>) -> Self {
        PostmanError::Disconnected(message.into())
    }

    pub fn conflicting_alias(message: impl Into<String>) -> Self {
        PostmanError::ConflictingAlias(message.into())
    }

    pub fn no_perfect_matching(message: impl Into<String>) -> Self {
        PostmanError::NoPerfectMatching(message.into())
    }

    pub fn eulerization_failed(message: impl Into<String>) -> Self {
        PostmanError::EulerizationFailed(message.into())
    }

    pub fn no_route(message: impl Into<String>) -> Self {
        PostmanError::NoRoute(message.into())
    }
}

impl fmt::Display for PostmanError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PostmanError::InvalidEdge(msg) => write!(f, "invalid edge: {msg}"),
            PostmanError::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
            PostmanError::Disconnected(msg) => write!(f, "graph is not connected: {msg}"),
            PostmanError::ConflictingAlias(msg) => write!(f, "conflicting alias map: {msg}"),
            PostmanError::NoPerfectMatching(msg) => write!(f, "no perfect matching: {msg}"),
            PostmanError::EulerizationFailed(msg) => write!(f, "eulerization failed: {msg}"),
            PostmanError::NoRoute(msg) => write!(f, "no route: {msg}"),
            PostmanError::EmptyHeap => write!(f, "heap is empty"),
            PostmanError::DuplicateSatellite(s) => write!(f, "duplicate satellite: {s}"),
            PostmanError::IoError(msg) => write!(f, "I/O error: {msg}"),
        }
    }
}

impl Error for PostmanError {}

impl From<std::io::Error> for PostmanError {
    fn from(e: std::io::Error) -> Self {
        PostmanError::IoError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PostmanError>;
