// All LLM prompt constants for the screening module.
// Both prompts are sent with llm_client::prompts::JSON_ONLY_SYSTEM.

/// Interview-kit prompt. Fill `{job_description}` and `{resume_text}` with [`fill_template`].
pub const INITIAL_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert AI recruitment assistant. Analyze a candidate's resume against a specific job description and produce a comprehensive interview kit.

**Job Description:**
"""
{job_description}
"""

**Candidate's Resume Text:**
"""
{resume_text}
"""

Return a single JSON object with this EXACT structure:
{
  "candidateName": "The candidate's full name, if found, otherwise 'Not Found'",
  "alignmentSummary": {
    "summaryText": "A 2-3 sentence summary of how well the candidate's experience aligns with the job description.",
    "strengths": ["List of key strengths that match the job role."],
    "potentialGaps": ["List of potential gaps or areas not explicitly mentioned in the resume."]
  },
  "categorizedQuestions": {
    "Skill Match": [
      {
        "question": "A question directly related to a skill mentioned in the job description AND the resume.",
        "difficulty": 3,
        "expectedAnswer": "A detailed, ideal answer for this question.",
        "keywords": ["keywords", "to", "listen", "for"],
        "nonTechnicalExplanation": "A simple, non-technical explanation of the core concept being tested."
      }
    ],
    "Behavioral": [
      {
        "question": "A behavioral question to assess teamwork or problem-solving.",
        "difficulty": 2,
        "expectedAnswer": "A detailed, ideal answer outlining a positive behavior.",
        "keywords": ["teamwork", "communication", "problem-solving"],
        "nonTechnicalExplanation": "This question assesses the candidate's soft skills."
      }
    ],
    "Project Experience": [
      {
        "question": "A question about a specific project listed on the resume.",
        "difficulty": 4,
        "expectedAnswer": "The candidate explains their specific role and the outcome of the project.",
        "keywords": ["my role", "outcome", "challenge", "solution"],
        "nonTechnicalExplanation": "This verifies the candidate's actual depth of involvement."
      }
    ]
  }
}

"difficulty" is an integer from 1 (easy) to 5 (hard)."#;

/// Deep-dive prompt. Fill `{resume_text}` with [`fill_template`].
pub const DEEP_DIVE_PROMPT_TEMPLATE: &str = r#"You are a senior technical interviewer. Conduct a deep-dive analysis of a candidate's resume. Scrutinize their project experience, identify potential inconsistencies, and formulate highly specific, challenging questions.

**Candidate's Resume Text:**
"""
{resume_text}
"""

Return a single JSON object with this EXACT structure:
{
  "projectAnalyses": [
    {
      "projectName": "Name of a specific project from the resume.",
      "analysis": "A critical analysis of the project description: technologies used and the candidate's claimed contribution.",
      "pinPointedQuestion": "A highly specific technical question about this project to verify depth of knowledge."
    }
  ],
  "potentialInconsistencies": [
    "A potential inconsistency or vague claim found in the resume.",
    "Another point that requires clarification, e.g. overlapping project timelines."
  ]
}"#;

/// Substitutes `{name}` placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned, so a job description that happens
/// to contain `{resume_text}` stays literal. Braces that do not form a known
/// placeholder (the JSON skeletons above) are copied through.
pub fn fill_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let hit = vars.iter().find(|(name, _)| {
            after
                .strip_prefix(name)
                .is_some_and(|tail| tail.starts_with('}'))
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
