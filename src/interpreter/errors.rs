//! Learner-facing error types for the interpreter
//!
//! This module defines [`ErrorKind`], the closed set of mistakes a program can
//! contain, and [`ExecutionError`], which pins a kind to the line where it was
//! detected.
//!
//! All errors are fatal - the run stops at the offending line and the message
//! is shown to the learner as-is, so every message is written in French.

use crate::interpreter::state::Pin;
use thiserror::Error;

/// Every way a line can stop a run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Executable line without a trailing `;`
    #[error("Il manque un point-virgule (;) à la fin de cette ligne!")]
    MissingSemicolon,

    /// `pinN` where N is not on the board (digits kept verbatim)
    #[error("pin{0} n'existe pas!")]
    UnknownPin(String),

    /// Pin switched on or off before its declaration line ran
    #[error("{0} n'a pas été déclaré!")]
    PinNotDeclared(Pin),

    /// `pinN_something;` with an unknown action word
    #[error("Commande incorrecte! Utilise \"pinX_allumé;\" ou \"pinX_éteint;\"")]
    MalformedPinCommand,

    /// Mentions `pin` but fits no pin statement shape
    #[error("Syntaxe incorrecte!")]
    UnknownPinSyntax,

    /// Anything else the grammar does not know
    #[error("Cette ligne n'est pas du code valide!")]
    InvalidStatement,

    /// Condition refers to a variable that was never assigned
    #[error("La variable \"{0}\" n'existe pas!")]
    UndeclaredVariable(String),

    /// Condition is not `<variable> <op> <value>`
    #[error("Condition incorrecte! Utilise \"si (variable == valeur) alors {{\"")]
    InvalidCondition,

    /// Section or conditional header whose `{ ... }` never closes
    #[error("Il manque une accolade fermante }} pour ce bloc!")]
    UnclosedBlock,

    /// Nothing but whitespace was submitted
    #[error("Le code est vide!")]
    EmptyProgram,
}

/// An [`ErrorKind`] tagged with the 0-based index of the line that raised it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ligne {}: {}", .line + 1, .kind)]
pub struct ExecutionError {
    pub line: usize,
    pub kind: ErrorKind,
}

impl ExecutionError {
    pub fn new(line: usize, kind: ErrorKind) -> Self {
        ExecutionError { line, kind }
    }

    /// The message attached inline to the errored line
    pub fn message(&self) -> String {
        format!("Erreur: {}", self.kind)
    }
}
