use std::fmt::Write;

use super::types::{DetailLevel, MathQuestion};
use crate::eval::Number;

pub const SYSTEM_PROMPT_ZH: &str = "你是一个专业的小学数学老师，擅长解释数学题目和指导学生逐步解题。请用清晰、通俗易懂的语言提供详细的解题步骤和解释。";
pub const SYSTEM_PROMPT_EN: &str = "You are a professional elementary school math teacher who is good at explaining math problems and guiding students step by step. Use clear, simple language to give detailed solution steps and explanations.";

const SECTIONS_ZH: &str = "
请按照以下格式提供分析：

1. 题目理解：简述这道题要求解决什么问题
2. 解题思路：说明解题的基本方法和思路
3. 解题步骤：逐步详细说明每一步的计算过程
4. 关键概念：涉及的数学概念
5. 常见错误：学生容易犯的错误
6. 解题技巧：有助于解题的技巧和方法
7. 难度分析：该题的难度等级和原因
8. 其他解法：如果有的话，提供其他解题方法

请确保解释通俗易懂，适合小学生理解。
";

const SECTIONS_EN: &str = "
Please provide analysis in the following format:

1. Problem Understanding: Briefly describe what this problem asks to solve
2. Solution Approach: Explain the basic method and approach for solving
3. Solution Steps: Step-by-step detailed explanation of each calculation
4. Key Concepts: Mathematical concepts involved
5. Common Mistakes: Errors students often make
6. Solving Tips: Helpful techniques and methods for solving
7. Difficulty Analysis: Difficulty level and reasons
8. Alternative Methods: Other solving methods if available

Please ensure explanations are clear and suitable for elementary school students.
";

pub fn is_chinese(language: &str) -> bool {
    language == "zh-CN"
}

pub fn system_prompt(language: &str) -> &'static str {
    if is_chinese(language) {
        SYSTEM_PROMPT_ZH
    } else {
        SYSTEM_PROMPT_EN
    }
}

pub fn build_prompt(question: &MathQuestion, language: &str, detail_level: DetailLevel) -> String {
    let zh = is_chinese(language);
    let mut prompt = String::new();

    if zh {
        let _ = writeln!(prompt, "\n请分析以下数学题目并提供详细的解答步骤：\n");
        let _ = writeln!(prompt, "题目：{}", question.expression);
    } else {
        let _ = writeln!(prompt, "\nPlease analyze the following math problem and provide detailed solution steps:\n");
        let _ = writeln!(prompt, "Problem: {}", question.expression);
    }

    let labels = if zh {
        ["答案", "运算类型", "知识点"]
    } else {
        ["Answer", "Operation Type", "Knowledge Point"]
    };
    let separator = if zh { "：" } else { ": " };
    if let Some(answer) = question.answer {
        // Printed as a float, so 19 reads "19.0".
        let _ = writeln!(prompt, "{}{}{}", labels[0], separator, Number::Float(answer));
    }
    if let Some(operation) = question.operation.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(prompt, "{}{}{}", labels[1], separator, operation);
    }
    if let Some(point) = question.knowledge_point.as_deref().filter(|s| !s.is_empty()) {
        let _ = writeln!(prompt, "{}{}{}", labels[2], separator, point);
    }

    prompt.push_str(if zh { SECTIONS_ZH } else { SECTIONS_EN });

    match (detail_level, zh) {
        (DetailLevel::Simple, true) => prompt.push_str("每个部分请尽量简短。\n"),
        (DetailLevel::Simple, false) => prompt.push_str("Keep every section short.\n"),
        (DetailLevel::Detailed, true) => prompt.push_str("请尽量详细地解释每一步。\n"),
        (DetailLevel::Detailed, false) => prompt.push_str("Explain every step in as much detail as possible.\n"),
        (DetailLevel::Standard, _) => {}
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_prompt_embeds_question_fields() {
        let question = MathQuestion {
            expression: "12 + 7".to_string(),
            answer: Some(19.0),
            operation: Some("加法".to_string()),
            knowledge_point: None,
            difficulty: Some(1),
        };
        let prompt = build_prompt(&question, "zh-CN", DetailLevel::Standard);
        assert!(prompt.contains("题目：12 + 7"));
        assert!(prompt.contains("答案：19.0\n"));
        assert!(prompt.contains("运算类型：加法"));
        assert!(!prompt.contains("知识点："));
        assert!(prompt.contains("8. 其他解法"));
    }

    #[test]
    fn other_languages_use_english_template() {
        let prompt = build_prompt(&MathQuestion::new("3 * 4"), "en-US", DetailLevel::Simple);
        assert!(prompt.contains("Problem: 3 * 4"));
        assert!(prompt.contains("1. Problem Understanding"));
        assert!(prompt.contains("8. Alternative Methods"));
        assert!(prompt.contains("Keep every section short."));
        assert!(!prompt.contains("Answer:"));

        let mut question = MathQuestion::new("5 / 2");
        question.answer = Some(2.5);
        let prompt = build_prompt(&question, "en-US", DetailLevel::Standard);
        assert!(prompt.contains("Answer: 2.5\n"));
        assert_eq!(system_prompt("en-US"), SYSTEM_PROMPT_EN);
    }
}
