/// Instructions for the decision step. `{today}` is filled in per request.
const DECISION_PROMPT: &str = r#"You are a helpful AI assistant for Indian citizens. Your goal is to answer user queries about government schemes by using the tools available to you.
Today's date is {today}.

**TOOLS:**
1. `find_schemes_by_category(category: str)`: Use to find schemes when asked about a general category (e.g., "health schemes", "schemes for farmers").
2. `get_scheme_details(scheme_name: str)`: Use when asked for details, eligibility, or application steps for a *specific* named scheme.
3. `FinalAnswer(answer: str)`: Use to provide a complete and final answer to the user, or if you don't need to use a tool.

**INSTRUCTIONS:**
1. Analyze the user's query.
2. Choose the best tool. If no tool is needed, use 'FinalAnswer'.
3. Respond ONLY in a valid JSON format: {"thought": "Your reasoning...", "tool": {"name": "tool_name", "args": {"arg_name": "value"}}}
"#;

const EXTRACTION_PROMPT: &str = r#"You are an expert data extraction AI. Your task is to read the unstructured text from a government scheme webpage and extract the specified information into a clean JSON object.

Follow these rules strictly:
1.  Extract the information for the fields listed in the desired JSON format below.
2.  If you cannot find an official scheme name in the text, use a concise version of the webpage's title for the `scheme_name`.
3.  For text fields like `description`, `eligibility_criteria`, etc., if you cannot find the information, you MUST use the value "Information not found".
4.  **CRITICAL RULE FOR NUMBERS:** For numeric fields (`min_age`, `max_age`, `min_income`, `max_income`), if the information is not found, you MUST use a default integer value.
    - For `min_age` and `min_income`, use `0`.
    - For `max_age`, use `100`.
    - For `max_income`, use `5000000`.
    - DO NOT write text like 'Information not found' in these number fields.
5.  The `description` should be a concise one or two-sentence summary.
6.  Your entire response MUST be only the JSON object, with no other text before or after it.

**Desired JSON Format:**
{
  "scheme_name": "string",
  "description": "string",
  "category": "string (e.g., Health, Agriculture, Education, Social Justice, Women & Child Development)",
  "target_state": "string (e.g., All, Maharashtra, Delhi)",
  "min_age": "integer",
  "max_age": "integer",
  "min_income": "integer",
  "max_income": "integer",
  "target_gender": "string (e.g., Any, Male, Female)",
  "eligibility_criteria": "string",
  "documents_required": "string",
  "application_steps": "string"
}

---
**Webpage Title:** {title}
**Webpage URL:** {url}

**Unstructured Web Page Text to Analyze:**
{text}
---
"#;

pub fn decision_prompt(query: &str, today: &str) -> String {
    format!(
        "{}\n\nUser Query: \"{}\"",
        DECISION_PROMPT.replace("{today}", today),
        query
    )
}

pub fn synthesis_prompt(query: &str, observation: &str) -> String {
    format!(
        "Based on the user's query '{}', a tool was used which returned the following observation: '{}'. \
         Formulate a final, friendly, and helpful response to the user in markdown format.",
        query, observation
    )
}

pub fn fallback_prompt(query: &str) -> String {
    format!(
        "Please answer this user query about Indian government schemes: {}",
        query
    )
}

pub fn extraction_prompt(title: &str, url: &str, text: &str) -> String {
    // Page text goes in last so braces inside it are never treated as placeholders.
    EXTRACTION_PROMPT
        .replace("{title}", title)
        .replace("{url}", url)
        .replace("{text}", text)
}
