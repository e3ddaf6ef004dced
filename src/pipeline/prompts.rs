//! Prompt text sent to the text-completion service.

/// Instruction prompt for intent extraction.
pub const INTENT_PROMPT: &str = r#"
Instructions
Understand the Input:
The query can contain:

A medicine name (e.g., "Paracetamol").
A medicine composition (e.g., "Ibuprofen").
A disease/symptom (e.g., "fever"). Extract and categorize without inferring.
Process the Query:

Medicine Name: If a known medicine name is mentioned, assign it to medicine_name.
Medicine Composition: If an active ingredient is mentioned, assign it to medicine_composition.
Disease or Symptom: If a disease or symptom is mentioned, assign it to disease.
Handle Missing Information:
If a category is not mentioned, leave it blank in the output.

Output Format:
The output will always include medicine_name, medicine_composition, and disease, filling only the provided info.

Example Queries and Outputs:
Query: "Macfast"
Output:
{"medicine_name": "Macfast", "medicine_composition": "", "disease": ""}

Query: "Paracetamol for cold"
Output:
{"medicine_name": "", "medicine_composition": "Paracetamol", "disease": "Cold"}

Query: "I have a fever"
Output:
{"medicine_name": "", "medicine_composition": "", "disease": "Fever"}

--------------------------------

Now this is the input to query for output:

"#;

pub fn make_intent_prompt(query: &str) -> String {
    format!("Prompt: {}\nInput: {}\n\n", INTENT_PROMPT, query)
}

/// Second-hop prompt; `medicine_lines` holds one `- Name: ...` line per record.
pub fn make_answer_prompt(query: &str, medicine_lines: &[String]) -> String {
    if medicine_lines.is_empty() {
        return format!("Query: {}\nNo related medicines found.\n", query);
    }

    format!(
        "Query: {}\n\
         Based on the retrieved medicines:\n\
         {}\n\
         Please provide a comprehensive answer to inform the user about their condition, \
         causes, and options for relief.",
        query,
        medicine_lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intent_prompt_wraps_instructions_and_input() {
        let prompt = make_intent_prompt("I have a fever");
        assert!(prompt.starts_with("Prompt: \nInstructions"));
        assert!(prompt.ends_with("Input: I have a fever\n\n"));
        assert!(prompt.contains(r#"{"medicine_name": "Macfast", "medicine_composition": "", "disease": ""}"#));
    }

    #[test]
    fn answer_prompt_lists_medicines() {
        let lines = vec![
            "- Name: Dolo 650, Composition: Paracetamol (650mg), Uses: Fever".to_string(),
            "- Name: Crocin, Composition: Paracetamol (500mg), Uses: Pain relief".to_string(),
        ];
        let prompt = make_answer_prompt("I have a fever", &lines);
        assert_eq!(
            prompt,
            "Query: I have a fever\n\
             Based on the retrieved medicines:\n\
             - Name: Dolo 650, Composition: Paracetamol (650mg), Uses: Fever\n\
             - Name: Crocin, Composition: Paracetamol (500mg), Uses: Pain relief\n\
             Please provide a comprehensive answer to inform the user about their condition, \
             causes, and options for relief."
        );
    }

    #[test]
    fn answer_prompt_without_medicines_says_so() {
        assert_eq!(
            make_answer_prompt("Xyzzy", &[]),
            "Query: Xyzzy\nNo related medicines found.\n"
        );
    }
}
