// Static reference data served by the jobs endpoints.

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Serialize)]
pub struct JobCategories {
    pub job_types: &'static [&'static str],
    pub experience_levels: &'static [&'static str],
    pub industries: &'static [&'static str],
    pub popular_skills: &'static [&'static str],
}

pub static JOB_CATEGORIES: JobCategories = JobCategories {
    job_types: &[
        "full-time",
        "part-time",
        "contract",
        "freelance",
        "internship",
        "temporary",
    ],
    experience_levels: &["entry", "junior", "mid", "senior", "lead", "executive"],
    industries: &[
        "Technology",
        "Healthcare",
        "Finance",
        "Education",
        "Marketing",
        "Sales",
        "Design",
        "Engineering",
        "Data Science",
        "Product Management",
        "Operations",
        "Human Resources",
    ],
    popular_skills: &[
        "Python",
        "JavaScript",
        "React",
        "Node.js",
        "SQL",
        "AWS",
        "Docker",
        "Kubernetes",
        "Machine Learning",
        "Data Analysis",
        "Project Management",
        "Agile",
        "DevOps",
        "UI/UX Design",
        "Mobile Development",
    ],
};

pub fn job_market_insights() -> Value {
    json!({
        "trending_skills": [
            {"skill": "Artificial Intelligence", "demand": "Very High", "growth": "+45%"},
            {"skill": "Machine Learning", "demand": "High", "growth": "+38%"},
            {"skill": "Cloud Computing", "demand": "High", "growth": "+32%"},
            {"skill": "Data Science", "demand": "High", "growth": "+28%"},
            {"skill": "Cybersecurity", "demand": "High", "growth": "+25%"},
            {"skill": "DevOps", "demand": "Medium", "growth": "+22%"},
            {"skill": "React", "demand": "Medium", "growth": "+18%"},
            {"skill": "Python", "demand": "Medium", "growth": "+15%"}
        ],
        "salary_ranges": {
            "entry_level": "$50,000 - $70,000",
            "mid_level": "$70,000 - $120,000",
            "senior_level": "$120,000 - $180,000",
            "lead_level": "$150,000 - $250,000"
        },
        "remote_work_trends": {
            "percentage_remote": "42%",
            "hybrid_work": "38%",
            "fully_remote": "26%",
            "on_site": "20%"
        },
        "hiring_trends": [
            "Companies are prioritizing soft skills alongside technical skills",
            "Remote work options are becoming standard",
            "Diversity and inclusion initiatives are expanding",
            "Continuous learning and upskilling are highly valued",
            "Project-based and contract work is increasing"
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_serialize_with_expected_keys() {
        let value = serde_json::to_value(&JOB_CATEGORIES).unwrap();
        assert_eq!(value["job_types"][0], "full-time");
        assert_eq!(value["experience_levels"].as_array().unwrap().len(), 6);
        assert!(value["popular_skills"]
            .as_array()
            .unwrap()
            .contains(&json!("Kubernetes")));
    }

    #[test]
    fn test_market_insights_shape() {
        let insights = job_market_insights();
        assert_eq!(insights["trending_skills"].as_array().unwrap().len(), 8);
        assert_eq!(insights["salary_ranges"]["entry_level"], "$50,000 - $70,000");
    }
}
