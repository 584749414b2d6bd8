// Static conversation starters and curated career resources.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ChatSuggestions {
    pub resume_topics: &'static [&'static str],
    pub job_search_topics: &'static [&'static str],
    pub interview_topics: &'static [&'static str],
    pub career_development_topics: &'static [&'static str],
}

pub static CHAT_SUGGESTIONS: ChatSuggestions = ChatSuggestions {
    resume_topics: &[
        "How can I improve my resume formatting?",
        "What keywords should I include in my resume?",
        "How do I optimize my resume for ATS systems?",
        "What's the best way to describe my achievements?",
        "How long should my resume be?",
        "What sections should I include in my resume?",
    ],
    job_search_topics: &[
        "What are the best job search strategies?",
        "How do I find remote work opportunities?",
        "What skills are most in demand right now?",
        "How do I network effectively?",
        "What should I research about companies?",
        "How do I follow up after applying?",
    ],
    interview_topics: &[
        "What are common interview questions?",
        "How do I answer behavioral questions?",
        "What should I wear to an interview?",
        "How do I prepare for technical interviews?",
        "What questions should I ask the interviewer?",
        "How do I handle salary negotiations?",
    ],
    career_development_topics: &[
        "How do I plan my career path?",
        "What skills should I develop next?",
        "How do I transition to a new industry?",
        "What certifications are worth pursuing?",
        "How do I build my professional network?",
        "How do I ask for a promotion or raise?",
    ],
};

#[derive(Debug, Serialize)]
pub struct Resource {
    pub name: &'static str,
    pub url: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

const fn resource(name: &'static str, url: &'static str, kind: &'static str) -> Resource {
    Resource { name, url, kind }
}

#[derive(Debug, Serialize)]
pub struct CareerResources {
    pub learning_platforms: &'static [Resource],
    pub job_boards: &'static [Resource],
    pub professional_networking: &'static [Resource],
    pub resume_tools: &'static [Resource],
    pub interview_prep: &'static [Resource],
}

pub static CAREER_RESOURCES: CareerResources = CareerResources {
    learning_platforms: &[
        resource("LinkedIn Learning", "https://www.linkedin.com/learning/", "Courses"),
        resource("Coursera", "https://www.coursera.org/", "Courses"),
        resource("Udemy", "https://www.udemy.com/", "Courses"),
        resource("edX", "https://www.edx.org/", "Courses"),
        resource("Khan Academy", "https://www.khanacademy.org/", "Free Courses"),
    ],
    job_boards: &[
        resource("LinkedIn Jobs", "https://www.linkedin.com/jobs/", "General"),
        resource("Indeed", "https://www.indeed.com/", "General"),
        resource("Glassdoor", "https://www.glassdoor.com/", "General"),
        resource("AngelList", "https://angel.co/", "Startups"),
        resource("Remote.co", "https://remote.co/", "Remote"),
    ],
    professional_networking: &[
        resource("LinkedIn", "https://www.linkedin.com/", "Professional Network"),
        resource("Meetup", "https://www.meetup.com/", "Local Events"),
        resource("Eventbrite", "https://www.eventbrite.com/", "Events"),
        resource("Slack Communities", "https://slack.com/", "Online Communities"),
    ],
    resume_tools: &[
        resource("Canva", "https://www.canva.com/", "Design"),
        resource("Resume.io", "https://resume.io/", "Builder"),
        resource("Zety", "https://zety.com/", "Builder"),
        resource("Grammarly", "https://www.grammarly.com/", "Writing"),
    ],
    interview_prep: &[
        resource("Pramp", "https://www.pramp.com/", "Mock Interviews"),
        resource("InterviewBit", "https://www.interviewbit.com/", "Practice"),
        resource("LeetCode", "https://leetcode.com/", "Coding Practice"),
        resource("HackerRank", "https://www.hackerrank.com/", "Coding Practice"),
    ],
};
