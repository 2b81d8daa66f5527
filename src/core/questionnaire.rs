//! Personalization questionnaire: fifteen free-text prompts over five pages.
//!
//! The answer set is fixed-size; paging is pure navigation and submission is
//! a separate act handled by the session layer one save per slot.

use std::ops::Range;

pub const ANSWER_COUNT: usize = 15;
pub const PAGE_COUNT: usize = 5;
pub const PAGE_SIZE: usize = 3;

/// Prompts in index order; page N covers indices `3N..3N+3`.
pub const PROMPTS: [&str; ANSWER_COUNT] = [
    "Please briefly describe the type of advice or strategies you prefer. For example, do you prefer high-risk, high-reward strategies, or more stable and conservative ones?",
    "Briefly describe the kind of tone you prefer in responses—for example, more humorous or more friendly.",
    "If you'd like me to respond to you in a certain role, what kind of role would you prefer?",
    "Briefly describe your work. If you're a student, briefly describe what you're studying.",
    "Briefly describe the types of questions or topics you prefer to consult a language model about.",
    "What tools, platforms, or programming languages do you primarily use in your daily work or studies?",
    "What topics or types of articles have you enjoyed reading the most recently?",
    "What is your preferred learning style?",
    "Do you prefer rigorous theoretical explanations or examples-based explanations?",
    "Have you recently enjoyed any specific movies, books, or music?",
    "Do you have any particular sports hobbies you've been into recently?",
    "Is there a hobby or interest you've always wanted to try but haven't yet?",
    "What is your current short-term goal?",
    "What is your current long-term goal?",
    "What kind of outcome would make you feel that this period has been truly worthwhile?",
];

/// Fixed answer set plus the page cursor.
#[derive(Debug, Clone)]
pub struct Questionnaire {
    answers: Vec<String>,
    page: usize,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self::new()
    }
}

impl Questionnaire {
    pub fn new() -> Self {
        Self {
            answers: vec![String::new(); ANSWER_COUNT],
            page: 0,
        }
    }

    /// Replace slots with previously saved answers, in index order. Surplus
    /// entries beyond the fixed set are ignored.
    pub fn load_saved(&mut self, saved: Vec<String>) {
        for (slot, answer) in self.answers.iter_mut().zip(saved) {
            *slot = answer;
        }
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    /// Record one answer. Returns false for an out-of-range index.
    pub fn record_answer(&mut self, index: usize, text: impl Into<String>) -> bool {
        let Some(slot) = self.answers.get_mut(index) else {
            return false;
        };
        *slot = text.into();
        true
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn on_last_page(&self) -> bool {
        self.page + 1 == PAGE_COUNT
    }

    /// Move to the next page; a no-op on the last one.
    pub fn advance_page(&mut self) -> bool {
        if self.on_last_page() {
            return false;
        }
        self.page += 1;
        true
    }

    /// Move to the previous page; a no-op on the first one.
    pub fn retreat_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Answer indices covered by the current page.
    pub fn page_indices(&self) -> Range<usize> {
        let start = self.page * PAGE_SIZE;
        start..start + PAGE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_blank_on_the_first_page() {
        let q = Questionnaire::new();
        assert_eq!(q.answers().len(), ANSWER_COUNT);
        assert!(q.answers().iter().all(String::is_empty));
        assert_eq!(q.page(), 0);
    }

    #[test]
    fn paging_clamps_at_both_ends() {
        let mut q = Questionnaire::new();
        assert!(!q.retreat_page());
        assert_eq!(q.page(), 0);
        for _ in 0..PAGE_COUNT {
            q.advance_page();
        }
        assert_eq!(q.page(), PAGE_COUNT - 1);
        assert!(q.on_last_page());
        assert!(!q.advance_page());
        assert!(q.retreat_page());
        assert_eq!(q.page(), PAGE_COUNT - 2);
    }

    #[test]
    fn page_indices_cover_all_slots_in_order() {
        let mut q = Questionnaire::new();
        let mut seen = Vec::new();
        loop {
            seen.extend(q.page_indices());
            if !q.advance_page() {
                break;
            }
        }
        assert_eq!(seen, (0..ANSWER_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn answers_record_by_index() {
        let mut q = Questionnaire::new();
        for i in 0..ANSWER_COUNT {
            assert!(q.record_answer(i, format!("answer {i}")));
        }
        assert_eq!(q.answer(14), Some("answer 14"));
        assert!(!q.record_answer(ANSWER_COUNT, "out of range"));
    }

    #[test]
    fn saved_answers_populate_in_order() {
        let mut q = Questionnaire::new();
        q.load_saved(vec!["a".into(), "b".into()]);
        assert_eq!(q.answer(0), Some("a"));
        assert_eq!(q.answer(1), Some("b"));
        assert_eq!(q.answer(2), Some(""));
    }

    #[test]
    fn surplus_saved_answers_are_ignored() {
        let mut q = Questionnaire::new();
        q.load_saved(vec!["x".into(); ANSWER_COUNT + 3]);
        assert_eq!(q.answers().len(), ANSWER_COUNT);
        assert_eq!(q.answer(ANSWER_COUNT - 1), Some("x"));
    }

    #[test]
    fn prompts_fill_every_page() {
        assert_eq!(PROMPTS.len(), PAGE_COUNT * PAGE_SIZE);
    }
}
