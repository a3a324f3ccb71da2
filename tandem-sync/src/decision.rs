//! Decision protocol between the orchestrator and the operator.
//!
//! A [`Decider`] is asked to pick one of a list of [`Choice`]s. Skipping is a
//! reserved answer, never a choice value, so every decision point resolves to
//! a closed enum with its own `Skip` variant.

use async_trait::async_trait;

use crate::error::SyncError;

/// One line in the list presented to the decider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    Item { label: String, value: &'static str },
    Separator,
}

impl Choice {
    pub fn item(label: impl Into<String>, value: &'static str) -> Self {
        Choice::Item {
            label: label.into(),
            value,
        }
    }
}

/// What the decider answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Chosen(String),
    Skip,
}

/// The single prompt surface. Asked sequentially, one question at a time.
#[async_trait]
pub trait Decider: Send + Sync {
    /// `context` is the stage tag, `prompt` the question.
    async fn ask(&self, context: &str, prompt: &str, choices: &[Choice]) -> Result<Answer, SyncError>;
}

/// A closed set of outcomes for one decision point.
pub trait Decision: Sized + Copy + PartialEq + 'static {
    /// Every non-skip outcome, in presentation order.
    const OPTIONS: &'static [Self];
    const SKIP: Self;

    fn value(self) -> &'static str;

    fn from_answer(answer: Answer) -> Result<Self, SyncError> {
        match answer {
            Answer::Skip => Ok(Self::SKIP),
            Answer::Chosen(value) => Self::OPTIONS
                .iter()
                .copied()
                .find(|option| option.value() == value)
                .ok_or(SyncError::Decision(value)),
        }
    }
}

/// Only the local side exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalOrphanDecision {
    Upload,
    Remove,
    Skip,
}

impl Decision for LocalOrphanDecision {
    const OPTIONS: &'static [Self] = &[Self::Upload, Self::Remove];
    const SKIP: Self = Self::Skip;

    fn value(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Remove => "remove",
            Self::Skip => "skip",
        }
    }
}

/// Only the GitHub side exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOrphanDecision {
    Clone,
    Remove,
    Skip,
}

impl Decision for RemoteOrphanDecision {
    const OPTIONS: &'static [Self] = &[Self::Clone, Self::Remove];
    const SKIP: Self = Self::Skip;

    fn value(self) -> &'static str {
        match self {
            Self::Clone => "clone",
            Self::Remove => "remove",
            Self::Skip => "skip",
        }
    }
}

/// Both sides exist under different names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameDecision {
    UseLocal,
    UseGithub,
    Skip,
}

impl Decision for NameDecision {
    const OPTIONS: &'static [Self] = &[Self::UseLocal, Self::UseGithub];
    const SKIP: Self = Self::Skip;

    fn value(self) -> &'static str {
        match self {
            Self::UseLocal => "use-local",
            Self::UseGithub => "use-github",
            Self::Skip => "skip",
        }
    }
}

/// Ask `decider` and map the answer onto `D`.
pub async fn decide<D: Decision>(
    decider: &dyn Decider,
    context: &str,
    prompt: &str,
    label: impl Fn(D) -> String,
) -> Result<D, SyncError> {
    let choices: Vec<Choice> = D::OPTIONS
        .iter()
        .map(|&option| Choice::item(label(option), option.value()))
        .collect();
    let answer = decider.ask(context, prompt, &choices).await?;
    D::from_answer(answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skip_answer_maps_to_skip_variant() {
        assert_eq!(
            NameDecision::from_answer(Answer::Skip).unwrap(),
            NameDecision::Skip
        );
    }

    #[test]
    fn chosen_value_maps_to_option() {
        assert_eq!(
            LocalOrphanDecision::from_answer(Answer::Chosen("upload".into())).unwrap(),
            LocalOrphanDecision::Upload
        );
        assert_eq!(
            RemoteOrphanDecision::from_answer(Answer::Chosen("clone".into())).unwrap(),
            RemoteOrphanDecision::Clone
        );
    }

    #[test]
    fn skip_is_never_an_offered_value() {
        assert!(LocalOrphanDecision::OPTIONS.iter().all(|o| o.value() != "skip"));
        assert!(RemoteOrphanDecision::OPTIONS.iter().all(|o| o.value() != "skip"));
        assert!(NameDecision::OPTIONS.iter().all(|o| o.value() != "skip"));
    }

    #[test]
    fn unknown_value_is_an_error() {
        let err = NameDecision::from_answer(Answer::Chosen("rename".into())).unwrap_err();
        assert!(matches!(err, SyncError::Decision(v) if v == "rename"));
    }
}
