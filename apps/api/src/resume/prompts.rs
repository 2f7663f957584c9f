// All LLM prompt constants for resume customization.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Persona half of the tailoring system prompt; `JSON_ONLY_SYSTEM` follows it.
pub const CUSTOMIZE_PERSONA: &str = "You are an expert resume writer who tailors an existing CV \
    to a specific job without changing the facts it contains.";

/// Tailoring prompt template.
/// Replace: {job_role}, {job_description}, {original_cv}, {no_fabrication}
pub const CUSTOMIZE_PROMPT_TEMPLATE: &str = r#"Customize the CV below so it better matches the job role and description.

Job Role: {job_role}

Job Description:
{job_description}

Original CV:
{original_cv}

Create a tailored resume that:
1. Highlights relevant skills and experiences that match the job requirements
2. Uses appropriate keywords from the job description
3. Reorganizes content to emphasize the most relevant qualifications
4. Maintains the candidate's genuine experience and skills (no fabrication)
5. Has a professional format with clear sections for:
   - Contact Information (use original)
   - Professional Summary (tailored to the role)
   - Skills (prioritized based on job relevance)
   - Work Experience (emphasizing relevant achievements)
   - Education
   - Personal Projects (only if the original CV has any)

{no_fabrication}

Return a JSON object with this EXACT schema. Omit any field the CV does not
support instead of writing a placeholder:
{
  "name": "Full Name",
  "contact_info": {
    "location": "City, Country",
    "phone": "+1 555 0100",
    "email": "name@example.com",
    "linkedin": "linkedin.com/in/handle",
    "github": "github.com/handle",
    "portfolio": "https://example.com",
    "additional": "Any other contact detail"
  },
  "professional_summary": "Two to four sentences tailored to the role.",
  "skills": ["Most relevant skill first"],
  "work_experience": [
    {
      "title": "Job Title",
      "company": "Company",
      "location": "City",
      "duration": "Jan 2020 - Present",
      "achievements": ["Achievement with measurable impact"]
    }
  ],
  "education": [
    {
      "degree": "Degree",
      "institution": "Institution",
      "location": "City",
      "duration": "2014 - 2018",
      "details": ["Honours, coursework, or GPA"]
    }
  ],
  "projects": [
    {"name": "Project", "details": ["What it does and what you built"]}
  ]
}"#;
