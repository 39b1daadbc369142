use std::io::{self, Write};

use serde_json::Value;

use crate::models::{CLIConfig, TaskInfo, TaskResult};

pub fn banner(cfg: &CLIConfig) {
    println!("Math Server Debug CLI");
    println!("API: {}", cfg.base_url);
    println!("Language: {}  Detail: {}", cfg.language, cfg.detail_level);
    println!("Type an expression to evaluate, or /help for commands.");
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  <expression>           Evaluate an expression");
    println!("  /analyze <expression>  Request an AI analysis");
    println!("  /tasks [limit]         List execution tasks");
    println!("  /aitasks [limit]       List analysis tasks");
    println!("  /aiconfig              Show the effective AI configuration");
    println!("  /lang <code>           Set analysis language");
    println!("  /detail <level>        Set detail level (simple|standard|detailed)");
    println!("  /base <url>            Update base URL");
    println!("  /config                Show current config");
    println!("  /help                  Show commands");
    println!("  /exit | /quit          Exit");
}

pub fn result(task: &TaskResult) {
    match (&task.result, &task.error) {
        (Some(result), _) => println!("= {}", result),
        (None, Some(err)) => println!("error: {}", err),
        (None, None) => println!("[{}] {}", task.status, task.task_id),
    }
}

pub fn analysis(task: &TaskResult) {
    if let Some(err) = &task.error {
        println!("error: {}", err);
        return;
    }
    let Some(analysis) = &task.analysis else {
        println!("[{}] {}", task.status, task.task_id);
        return;
    };
    text("Understanding", &analysis["problem_understanding"]);
    text("Approach", &analysis["solution_approach"]);
    if let Some(steps) = analysis["solution_steps"].as_array() {
        println!("Steps:");
        for step in steps {
            println!(
                "  {}. {}",
                step["step_number"],
                step["description"].as_str().unwrap_or_default()
            );
            if let Some(explanation) = step["explanation"].as_str().filter(|s| !s.is_empty()) {
                println!("     {}", explanation);
            }
        }
    }
    list("Key concepts", &analysis["key_concepts"]);
    list("Common mistakes", &analysis["common_mistakes"]);
    list("Tips", &analysis["tips"]);
    text("Difficulty", &analysis["difficulty_analysis"]);
    list("Alternatives", &analysis["alternative_methods"]);
}

fn text(label: &str, value: &Value) {
    if let Some(text) = value.as_str().filter(|s| !s.is_empty()) {
        println!("{}: {}", label, text);
    }
}

fn list(label: &str, value: &Value) {
    let items = value.as_array().cloned().unwrap_or_default();
    if items.is_empty() {
        return;
    }
    println!("{}:", label);
    for item in items {
        println!("  - {}", item.as_str().unwrap_or_default());
    }
}

pub fn tasks(tasks: &[TaskInfo]) {
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    for task in tasks {
        let flag = if task.has_error { " (error)" } else { "" };
        println!(
            "[{}] {} submitted {} completed {}{}",
            task.status,
            task.task_id,
            task.submitted_at,
            task.completed_at.as_deref().unwrap_or("-"),
            flag
        );
    }
}

pub fn config(cfg: &CLIConfig) {
    println!("config:");
    println!("  base: {}", cfg.base_url);
    println!("  lang: {}", cfg.language);
    println!("  detail: {}", cfg.detail_level);
    println!("  timeout: {}s", cfg.timeout);
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
