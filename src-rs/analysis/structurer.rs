//! Line classifier that turns a free-form model reply into a
//! [`StructuredAnalysis`].
//!
//! The classifier is a small state machine: the state is the section the
//! cursor is in, and header lines (matched case-insensitively against
//! [`SECTION_HEADERS`]) move the cursor. Everything else is routed by the
//! current section's [`SectionKind`]. Unrecognised structure is dropped, not
//! reported.

use tracing::debug;

use super::types::{MathQuestion, SolutionStep, StructuredAnalysis};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    ProblemUnderstanding,
    SolutionApproach,
    SolutionSteps,
    KeyConcepts,
    CommonMistakes,
    Tips,
    DifficultyAnalysis,
    AlternativeMethods,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionKind {
    Text,
    Steps,
    List,
}

impl Section {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::ProblemUnderstanding | Section::SolutionApproach | Section::DifficultyAnalysis => {
                SectionKind::Text
            }
            Section::SolutionSteps => SectionKind::Steps,
            Section::KeyConcepts | Section::CommonMistakes | Section::Tips | Section::AlternativeMethods => {
                SectionKind::List
            }
        }
    }
}

/// Header keywords per section, checked in order.
pub const SECTION_HEADERS: [(Section, &[&str]); 8] = [
    (Section::ProblemUnderstanding, &["题目理解", "problem understanding"]),
    (Section::SolutionApproach, &["解题思路", "solution approach"]),
    (Section::SolutionSteps, &["解题步骤", "solution steps"]),
    (Section::KeyConcepts, &["关键概念", "key concepts"]),
    (Section::CommonMistakes, &["常见错误", "common mistakes"]),
    (Section::Tips, &["解题技巧", "solving tips"]),
    (Section::DifficultyAnalysis, &["难度分析", "difficulty analysis"]),
    (Section::AlternativeMethods, &["其他解法", "alternative methods"]),
];

const STEP_WORDS: [&str; 2] = ["步骤", "step"];
const BULLETS: [char; 3] = ['-', '*', '•'];

pub fn header_section(line: &str) -> Option<Section> {
    let lowered = line.to_lowercase();
    SECTION_HEADERS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(section, _)| *section)
}

#[derive(Default)]
struct Structurer {
    current: Option<Section>,
    next_step: u32,
    analysis: StructuredAnalysis,
}

impl Structurer {
    fn feed(&mut self, line: &str) {
        if let Some(section) = header_section(line) {
            self.current = Some(section);
            return;
        }
        let Some(section) = self.current else {
            return;
        };
        match section.kind() {
            SectionKind::Text => append_text(self.text_mut(section), line),
            SectionKind::Steps => self.feed_step(line),
            SectionKind::List => {
                let items = self.list_mut(section);
                if starts_list_item(line) {
                    items.push(line.trim_start_matches(&BULLETS[..]).trim().to_string());
                } else if let Some(last) = items.last_mut() {
                    append_text(last, line);
                }
            }
        }
    }

    fn feed_step(&mut self, line: &str) {
        if starts_step(line, self.next_step) {
            self.analysis.solution_steps.push(SolutionStep {
                step_number: self.next_step,
                description: line.to_string(),
                explanation: String::new(),
            });
            self.next_step += 1;
        } else if let Some(last) = self.analysis.solution_steps.last_mut() {
            append_text(&mut last.explanation, line);
        }
    }

    fn text_mut(&mut self, section: Section) -> &mut String {
        match section {
            Section::SolutionApproach => &mut self.analysis.solution_approach,
            Section::DifficultyAnalysis => &mut self.analysis.difficulty_analysis,
            _ => &mut self.analysis.problem_understanding,
        }
    }

    fn list_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::CommonMistakes => &mut self.analysis.common_mistakes,
            Section::Tips => &mut self.analysis.tips,
            Section::AlternativeMethods => &mut self.analysis.alternative_methods,
            _ => &mut self.analysis.key_concepts,
        }
    }

    fn finish(mut self) -> StructuredAnalysis {
        for text in [
            &mut self.analysis.problem_understanding,
            &mut self.analysis.solution_approach,
            &mut self.analysis.difficulty_analysis,
        ] {
            *text = text.trim().to_string();
        }
        self.analysis
    }
}

/// Step markers are case-sensitive, unlike section headers.
fn starts_step(line: &str, ordinal: u32) -> bool {
    STEP_WORDS.iter().any(|word| line.starts_with(word)) || line.starts_with(&ordinal.to_string())
}

fn starts_list_item(line: &str) -> bool {
    line.starts_with(&BULLETS[..]) || line.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn append_text(target: &mut String, line: &str) {
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(line);
}

/// Classifies `raw` line by line into the fixed analysis schema.
pub fn structure(raw: &str, question: &MathQuestion) -> StructuredAnalysis {
    let mut structurer = Structurer {
        next_step: 1,
        ..Default::default()
    };
    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        structurer.feed(line);
    }
    let analysis = structurer.finish();
    debug!(
        expression = %question.expression,
        steps = analysis.solution_steps.len(),
        "structured model reply"
    );
    analysis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(raw: &str) -> StructuredAnalysis {
        structure(raw, &MathQuestion::new("12 + 7"))
    }

    #[test]
    fn text_without_headers_yields_empty_defaults() {
        let analysis = run("The answer is 19.\nJust add them.\n\n- a bullet");
        assert_eq!(analysis, StructuredAnalysis::default());
    }

    #[test]
    fn three_step_markers_yield_three_ordered_steps() {
        let raw = "\
3. Solution Steps:
step 1: add the ones
add 2 and 7 to get 9
step 2: add the tens
3. combine
the result is 19";
        let analysis = run(raw);
        let numbers: Vec<u32> = analysis.solution_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(analysis.solution_steps[0].description, "step 1: add the ones");
        assert_eq!(analysis.solution_steps[0].explanation, "add 2 and 7 to get 9");
        assert_eq!(analysis.solution_steps[2].explanation, "the result is 19");
    }

    #[test]
    fn capitalized_step_word_is_not_a_marker() {
        let raw = "Solution Steps\nStep 1: orphan\n1. first\nStep 2: more detail";
        let analysis = run(raw);
        assert_eq!(analysis.solution_steps.len(), 1);
        assert_eq!(analysis.solution_steps[0].description, "1. first");
        assert_eq!(analysis.solution_steps[0].explanation, "Step 2: more detail");
    }

    #[test]
    fn ordinal_markers_and_leading_orphan_lines() {
        let raw = "解题步骤\n先看个位\n1. 个位相加\n2. 十位相加\n步骤三：合并";
        let analysis = run(raw);
        assert_eq!(analysis.solution_steps.len(), 3);
        assert_eq!(analysis.solution_steps[0].description, "1. 个位相加");
        assert_eq!(analysis.solution_steps[2].description, "步骤三：合并");
    }

    #[test]
    fn chinese_reply_fills_every_section() {
        let raw = "\
1. 题目理解：
这道题要求计算两个数的和。

2. 解题思路：
先算个位，再算十位。
3. 解题步骤：
步骤1：2 + 7 = 9
个位相加
步骤2：10 + 9 = 19
4. 关键概念：
- 加法
- 进位
5. 常见错误：
* 忘记进位
6. 解题技巧：
• 凑十法
可以更快
7. 难度分析：
简单题。
8. 其他解法：
1) 数数";
        let analysis = run(raw);
        assert_eq!(analysis.problem_understanding, "这道题要求计算两个数的和。");
        assert_eq!(analysis.solution_approach, "先算个位，再算十位。");
        assert_eq!(analysis.solution_steps.len(), 2);
        assert_eq!(analysis.solution_steps[0].explanation, "个位相加");
        assert_eq!(analysis.key_concepts, vec!["加法", "进位"]);
        assert_eq!(analysis.common_mistakes, vec!["忘记进位"]);
        assert_eq!(analysis.tips, vec!["凑十法 可以更快"]);
        assert_eq!(analysis.difficulty_analysis, "简单题。");
        assert_eq!(analysis.alternative_methods, vec!["1) 数数"]);
    }

    #[test]
    fn headers_match_case_insensitively_and_are_discarded() {
        let raw = "PROBLEM UNDERSTANDING\nAdd two numbers.\nworks across lines";
        let analysis = run(raw);
        assert_eq!(analysis.problem_understanding, "Add two numbers. works across lines");
    }

    #[test]
    fn list_continuation_before_first_item_is_dropped() {
        let raw = "Key Concepts:\nintro line\n- addition";
        assert_eq!(run(raw).key_concepts, vec!["addition"]);
    }
}
