//! Levels and exercises
//!
//! A [`Course`] is an ordered list of levels, each holding an ordered list of
//! exercises. The built-in course ships in `content/quest4.json`; other
//! courses can be loaded from a file with the same layout:
//!
//! ```json
//! { "levels": [ {
//!     "number": 1, "title": "...", "subtitle": "...",
//!     "popup": { "show": true, "title": "...", "content": "<p>...</p>" },
//!     "exercises": [ {
//!         "number": 1,
//!         "example_code": "void setup()\n{\n    pin1;\n}",
//!         "challenge": { "title": "...", "instructions": ["..."] },
//!         "expected_state": { "pins": { "pin1": { "declared": true } } }
//!     } ]
//! } ] }
//! ```
//!
//! Popup and instruction texts may carry light markup (`<strong>`, `<code>`,
//! `<p>`, `<li>`); [`plain_text`] flattens it for the terminal.

use crate::validator::ExpectedState;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

const BUILTIN_COURSE: &str = include_str!("../../content/quest4.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("cannot read course file: {0}")]
    Io(#[from] io::Error),
    #[error("invalid course file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("the course has no levels")]
    NoLevels,
    #[error("level {0} has no exercises")]
    EmptyLevel(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Course {
    pub levels: Vec<Level>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Level {
    pub number: u32,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub popup: Popup,
    pub exercises: Vec<Exercise>,
}

/// Rule reminder shown when a level starts
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Popup {
    pub show: bool,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Exercise {
    pub number: u32,
    pub example_code: String,
    pub challenge: Challenge,
    #[serde(default)]
    pub expected_state: ExpectedState,
    /// Walk the `loop()` body once before grading; unset lets the grader decide
    #[serde(default)]
    pub validate_loop: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Challenge {
    pub title: String,
    pub instructions: Vec<String>,
}

impl Course {
    /// The course compiled into the binary
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(BUILTIN_COURSE)
    }

    pub fn from_json(text: &str) -> Result<Self, ContentError> {
        let course: Course = serde_json::from_str(text)?;
        if course.levels.is_empty() {
            return Err(ContentError::NoLevels);
        }
        if let Some(level) = course.levels.iter().find(|l| l.exercises.is_empty()) {
            return Err(ContentError::EmptyLevel(level.number));
        }
        Ok(course)
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn level(&self, progress: Progress) -> &Level {
        &self.levels[progress.level]
    }

    pub fn exercise(&self, progress: Progress) -> &Exercise {
        &self.level(progress).exercises[progress.exercise]
    }
}

/// Where the learner is in a course. Only [`Progress::advance`] moves it, so
/// it always points at an existing exercise of the course it advanced in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    level: usize,
    exercise: usize,
}

/// What [`Progress::advance`] moved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Next exercise of the same level
    Exercise,
    /// First exercise of the next level
    Level,
    /// Nothing left; progress is unchanged
    Complete,
}

impl Progress {
    pub fn level_index(&self) -> usize {
        self.level
    }

    pub fn exercise_index(&self) -> usize {
        self.exercise
    }

    pub fn is_last_exercise(&self, course: &Course) -> bool {
        self.exercise + 1 >= course.level(*self).exercises.len()
    }

    pub fn advance(&mut self, course: &Course) -> Advance {
        if !self.is_last_exercise(course) {
            self.exercise += 1;
            Advance::Exercise
        } else if self.level + 1 < course.levels.len() {
            self.level += 1;
            self.exercise = 0;
            Advance::Level
        } else {
            Advance::Complete
        }
    }

    /// `(current, total)` exercises of the current level, 1-based
    pub fn fraction(&self, course: &Course) -> (usize, usize) {
        (self.exercise + 1, course.level(*self).exercises.len())
    }

    /// The level popup is due on the first exercise of a level that has one
    pub fn shows_popup(&self, course: &Course) -> bool {
        self.exercise == 0 && course.level(*self).popup.show
    }
}

/// Flatten light HTML markup into terminal text: tags are dropped, list
/// items become bullets and block ends become line breaks
pub fn plain_text(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(len) = rest[start..].find('>') else {
            out.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let tag = rest[start + 1..start + len].trim().to_ascii_lowercase();
        let name = tag.split_whitespace().next().unwrap_or("");
        match name {
            "li" => out.push_str("\n• "),
            "/p" | "/li" | "/ul" | "/pre" | "br" | "br/" => out.push('\n'),
            _ => {}
        }
        rest = &rest[start + len + 1..];
    }
    out.push_str(rest);

    let decoded = out
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&");

    let mut lines: Vec<&str> = Vec::new();
    for line in decoded.lines().map(str::trim_end) {
        if line.trim().is_empty() && lines.last().map_or(true, |l| l.trim().is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::state::{Pin, VarType};
    use crate::validator::{check, CheckOutcome, PinExpectation, VariableExpectation};

    #[test]
    fn test_builtin_course_shape() {
        let course = Course::builtin().unwrap();
        assert_eq!(course.levels.len(), 3);
        assert!(course.levels.iter().all(|l| l.exercises.len() == 3));
        assert_eq!(course.levels[2].title, "Conditions Simples (si...alors)");

        let first = &course.levels[0].exercises[0];
        assert_eq!(
            first.expected_state,
            ExpectedState::default()
                .with_pin(Pin::Pin1, PinExpectation::declared(true))
                .with_variable("vitesse", VariableExpectation::typed("5", VarType::Int))
        );
    }

    #[test]
    fn test_every_example_runs_cleanly() {
        let course = Course::builtin().unwrap();
        for level in &course.levels {
            for exercise in &level.exercises {
                let outcome = check(&exercise.example_code, &ExpectedState::default(), None);
                assert_eq!(
                    outcome,
                    CheckOutcome::Passed,
                    "level {} exercise {}",
                    level.number,
                    exercise.number
                );
            }
        }
    }

    #[test]
    fn test_advance_through_course() {
        let course = Course::builtin().unwrap();
        let mut progress = Progress::default();
        assert!(progress.shows_popup(&course));
        assert_eq!(progress.fraction(&course), (1, 3));

        assert_eq!(progress.advance(&course), Advance::Exercise);
        assert_eq!(progress.advance(&course), Advance::Exercise);
        assert!(progress.is_last_exercise(&course));
        assert_eq!(progress.advance(&course), Advance::Level);
        assert_eq!((progress.level_index(), progress.exercise_index()), (1, 0));
        // level 2 has no popup
        assert!(!progress.shows_popup(&course));

        for _ in 0..5 {
            progress.advance(&course);
        }
        assert_eq!((progress.level_index(), progress.exercise_index()), (2, 2));
        assert_eq!(progress.advance(&course), Advance::Complete);
        assert_eq!(course.exercise(progress).number, 3);
    }

    #[test]
    fn test_rejects_empty_content() {
        assert!(matches!(
            Course::from_json(r#"{ "levels": [] }"#),
            Err(ContentError::NoLevels)
        ));
        assert!(matches!(
            Course::from_json(r#"{ "levels": [ { "number": 4, "title": "", "subtitle": "", "exercises": [] } ] }"#),
            Err(ContentError::EmptyLevel(4))
        ));
        assert!(matches!(Course::from_json("["), Err(ContentError::Parse(_))));
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(
            plain_text("Déclare <strong>pin1</strong> et <strong>pin9</strong>"),
            "Déclare pin1 et pin9"
        );
        assert_eq!(
            plain_text("<p>Types :</p>\n<ul>\n<li><code>int</code> entiers</li>\n<li><code>float</code> décimaux</li>\n</ul>"),
            "Types :\n\n• int entiers\n\n• float décimaux"
        );
        assert_eq!(plain_text("a &lt; b"), "a < b");
        assert_eq!(plain_text("pas de balise <fermée"), "pas de balise <fermée");
    }
}
