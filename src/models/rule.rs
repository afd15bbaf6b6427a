use crate::error::InvalidRuleError;

pub const MIN_PATTERN_LEN: usize = 2;
pub const DEFAULT_PRIORITY: i32 = 50;
pub const PRIORITY_RANGE: std::ops::RangeInclusive<i32> = 1..=100;

/// Auto-categorization rule: descriptions containing `contains` get `category_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub id: Option<i64>,
    pub contains: String,
    pub category_id: i64,
    /// 1..=100, higher wins.
    pub priority: i32,
}

impl Rule {
    pub fn new(contains: &str, category_id: i64, priority: i32) -> Result<Self, InvalidRuleError> {
        let contains = check_pattern(contains)?;
        check_priority(priority)?;
        Ok(Self {
            id: None,
            contains,
            category_id,
            priority,
        })
    }

    /// Replace pattern, category and priority, keeping the id.
    pub fn edit(
        &mut self,
        contains: &str,
        category_id: i64,
        priority: i32,
    ) -> Result<(), InvalidRuleError> {
        let contains = check_pattern(contains)?;
        check_priority(priority)?;
        self.contains = contains;
        self.category_id = category_id;
        self.priority = priority;
        Ok(())
    }
}

fn check_pattern(contains: &str) -> Result<String, InvalidRuleError> {
    let trimmed = contains.trim();
    let len = trimmed.chars().count();
    if len < MIN_PATTERN_LEN {
        return Err(InvalidRuleError::PatternTooShort {
            len,
            min: MIN_PATTERN_LEN,
        });
    }
    Ok(trimmed.to_string())
}

fn check_priority(priority: i32) -> Result<(), InvalidRuleError> {
    if PRIORITY_RANGE.contains(&priority) {
        Ok(())
    } else {
        Err(InvalidRuleError::PriorityOutOfRange(priority))
    }
}
