//! The `quizkit init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("quizkit.toml").exists() {
        println!("quizkit.toml already exists, skipping.");
    } else {
        std::fs::write("quizkit.toml", SAMPLE_CONFIG)?;
        println!("Created quizkit.toml");
    }

    std::fs::create_dir_all("questions")?;
    let example_path = Path::new("questions/example.json");
    if example_path.exists() {
        println!("questions/example.json already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUESTIONS)?;
        println!("Created questions/example.json");
    }

    println!("\nNext steps:");
    println!("  1. Edit questions/example.json or add your own question file");
    println!("  2. Run: quizkit validate --questions questions/example.json");
    println!("  3. Run: quizkit take --questions questions/example.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizkit configuration

# Slot name for saved progress. Use a different key per quiz to keep
# several quizzes in progress at once.
storage_key = "quiz_progress"

# Where saved progress lives.
state_dir = "./.quizkit"

# Ask before submitting.
confirm_submit = true
"#;

const EXAMPLE_QUESTIONS: &str = r#"[
  {
    "question": "Which keyword declares an immutable binding in Rust?",
    "options": ["var", "let", "const mut", "static mut"],
    "correctAnswerIndex": 1,
    "explanation": "Bindings introduced with &quot;let&quot; are immutable unless marked mut."
  },
  {
    "question": "What does the &lt;code&gt;?&lt;/code&gt; operator do?",
    "options": [
      "Propagates an error or None to the caller",
      "Marks a value as optional",
      "Panics on error"
    ],
    "correctAnswerIndex": 0
  },
  {
    "question": "Which type owns a heap-allocated, growable string?",
    "options": ["&amp;str", "String", "char"],
    "correctAnswerIndex": 1,
    "explanation": "&amp;str is a borrowed slice; String owns its buffer."
  }
]
"#;
