// Match analysis prompt templates, shared by every live provider.

/// System instruction for providers that accept a separate system role.
pub const MATCH_SYSTEM: &str = "\
You are a professional resume matching expert. \
You MUST respond with valid JSON only. \
Do NOT include any text outside the JSON object. \
Do NOT use markdown code fences.";

const MATCH_INSTRUCTIONS: &str = r#"You are a professional resume matching expert. Your task is to compare a resume against a job description and provide a detailed analysis.

You MUST respond with ONLY valid JSON in this exact format, no other text:
{
  "score": <number between 0-100>,
  "summary": "<brief 1-2 sentence summary of the match>",
  "strengths": ["<strength 1>", "<strength 2>", ...],
  "gaps": ["<gap 1>", "<gap 2>", ...],
  "suggestions": ["<suggestion 1>", "<suggestion 2>", ...]
}

Be specific and actionable. Reference specific requirements from the job description and skills from the resume.

Analyze how well this resume matches the job description."#;

const MATCH_CLOSING: &str = "Respond with ONLY the JSON object, no additional text.";

/// Builds the single-turn match prompt. Resume and job text are embedded verbatim.
pub fn build_match_prompt(resume_text: &str, job_text: &str) -> String {
    format!(
        "{MATCH_INSTRUCTIONS}\n\n=== RESUME ===\n{resume_text}\n\n=== JOB DESCRIPTION ===\n{job_text}\n\n{MATCH_CLOSING}"
    )
}
