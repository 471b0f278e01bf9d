//! 题目目录
//!
//! 两条固定轨道：初级/中级（12 题）与专家/资深（8 题）

use crate::config::TrackPolicy;
use crate::models::{Participant, Question, Track};

/// 专家 / 资深轨道
pub fn advanced_questions() -> Vec<Question> {
    vec![
        Question::text(
            "adv-1",
            "What programming language do you primarily use for backend development, and why do you prefer it?",
        ),
        Question::text(
            "adv-2",
            "How do you approach designing scalable and secure APIs (e.g., REST, GraphQL)?",
        ),
        Question::multiple(
            "adv-3",
            "What database technologies do you work with? (Select all that apply)",
            &["PostgreSQL", "MySQL", "MongoDB", "SQLite", "Redis", "DynamoDB", "Cassandra", "Other"],
        ),
        Question::multiple(
            "adv-4",
            "How do you handle performance optimization for backend systems? (Select all that apply)",
            &[
                "Caching strategies (Redis, Memcached)",
                "Database indexing and query optimization",
                "Asynchronous processing and job queues",
                "Code profiling and bottleneck identification",
                "Load balancing and horizontal scaling",
                "CDN implementation",
                "Other approaches",
            ],
        ),
        Question::multiple(
            "adv-5",
            "What challenges do you face when integrating third-party services or microservices? (Select all that apply)",
            &[
                "Authentication and authorization complexities",
                "Rate limiting and API quotas",
                "Versioning and backward compatibility",
                "Inconsistent or poor documentation",
                "Network reliability and latency issues",
                "Data consistency across services",
                "Monitoring and debugging distributed systems",
                "Other challenges",
            ],
        ),
        Question::multiple(
            "adv-6",
            "How do you stay updated on frameworks and tools? (Select all that apply)",
            &[
                "Official documentation and release notes",
                "Tech blogs and newsletters",
                "Developer conferences and meetups",
                "Social media and developer communities",
                "Online courses and certifications",
                "Podcasts and video content",
                "Open source contributions",
                "Experimentation with side projects",
            ],
        ),
        Question::multiple(
            "adv-7",
            "What strategies do you use to ensure data security and compliance? (Select all that apply)",
            &[
                "Encryption in transit and at rest",
                "Role-based access controls (RBAC)",
                "Comprehensive audit logging",
                "Regular security audits and penetration testing",
                "Secure development lifecycle (SSDL)",
                "Compliance frameworks (SOC 2, GDPR, HIPAA)",
                "Multi-factor authentication",
                "Other security measures",
            ],
        ),
        Question::text("adv-8", "How do you approach debugging complex server-side issues?"),
    ]
}

/// 初级 / 中级轨道
pub fn beginner_questions() -> Vec<Question> {
    vec![
        Question::text("beg-1", "How did you first get interested in tech or programming?"),
        Question::multiple(
            "beg-2",
            "Which programming languages or tools have you used so far? (Select all that apply)",
            &[
                "HTML/CSS",
                "JavaScript",
                "TypeScript",
                "Python",
                "Java",
                "C/C++",
                "React",
                "Node.js",
                "Git/GitHub",
                "Other",
            ],
        ),
        Question::single(
            "beg-3",
            "How confident do you feel in your current coding skills?",
            &[
                "Not confident at all",
                "Slightly confident",
                "Moderately confident",
                "Very confident",
                "Extremely confident",
            ],
        ),
        Question::text(
            "beg-4",
            "What types of projects have you worked on? Describe a few that you're proud of.",
        ),
        Question::multiple(
            "beg-5",
            "How do you usually learn new tech skills? (Select all that apply)",
            &[
                "YouTube tutorials",
                "Books and PDFs",
                "Trial and error",
                "Online courses (Udemy, Coursera, etc.)",
                "School/University",
                "Mentorship",
                "Documentation",
                "Coding bootcamps",
            ],
        ),
        Question::multiple(
            "beg-6",
            "Which areas of tech are you most interested in? (Select all that apply)",
            &[
                "Frontend Development",
                "Backend Development",
                "Mobile Development",
                "Data Science/ML",
                "DevOps/Cloud",
                "Cybersecurity",
                "UI/UX Design",
                "Game Development",
                "full stack Development",
                "Other",
            ],
        ),
        Question::text(
            "beg-7",
            "What's your biggest challenge when learning or building something new?",
        ),
        Question::single(
            "beg-8",
            "Do you collaborate with others or mostly work solo?",
            &[
                "Always work solo",
                "Mostly solo with occasional collaboration",
                "Balance of solo and team work",
                "Mostly collaborate with others",
                "Always work in teams",
            ],
        ),
        Question::text(
            "beg-9",
            "What would help you grow faster in tech? What resources or support do you need?",
        ),
        Question::text(
            "beg-10",
            "Where do you see yourself in 5 years, tech-wise? What are your goals and aspirations?",
        ),
        Question::multiple(
            "beg-11",
            "What development tools have you used? (Select all that apply)",
            &[
                "VS Code",
                "GitHub",
                "Stack Overflow",
                "ChatGPT/AI tools",
                "Figma",
                "Postman",
                "Chrome DevTools",
                "Other",
            ],
        ),
        Question::text(
            "beg-12",
            "If you could build any app or website, what would it be and why?",
        ),
    ]
}

/// 按轨道获取题目
pub fn questions_for(track: Track) -> Vec<Question> {
    match track {
        Track::Beginner => beginner_questions(),
        Track::Advanced => advanced_questions(),
    }
}

/// 根据策略和参与者决定作答轨道
pub fn resolve_track(policy: TrackPolicy, participant: &Participant) -> Track {
    match policy {
        TrackPolicy::Adaptive => participant.skill_level.track(),
        TrackPolicy::BeginnerOnly => Track::Beginner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuestionKind, SkillLevel};
    use std::collections::HashSet;

    #[test]
    fn test_track_sizes() {
        assert_eq!(beginner_questions().len(), 12);
        assert_eq!(advanced_questions().len(), 8);
    }

    #[test]
    fn test_ids_unique_and_ordered() {
        let ids: Vec<String> = beginner_questions()
            .iter()
            .map(|q| q.id().to_string())
            .collect();
        let expected: Vec<String> = (1..=12).map(|i| format!("beg-{}", i)).collect();
        assert_eq!(ids, expected);

        let adv: Vec<String> = advanced_questions()
            .iter()
            .map(|q| q.id().to_string())
            .collect();
        let expected: Vec<String> = (1..=8).map(|i| format!("adv-{}", i)).collect();
        assert_eq!(adv, expected);

        let all: HashSet<String> = ids.into_iter().chain(adv).collect();
        assert_eq!(all.len(), 20);
    }

    #[test]
    fn test_choice_questions_have_options() {
        for q in beginner_questions().iter().chain(advanced_questions().iter()) {
            match q.kind() {
                QuestionKind::Text => assert!(q.options().is_empty(), "{}", q.id()),
                _ => assert!(q.options().len() >= 5, "{}", q.id()),
            }
        }
    }

    #[test]
    fn test_resolve_track() {
        let pro = Participant::new("a", "b", "c", SkillLevel::Pro);
        assert_eq!(resolve_track(TrackPolicy::Adaptive, &pro), Track::Advanced);
        assert_eq!(resolve_track(TrackPolicy::BeginnerOnly, &pro), Track::Beginner);
        assert_eq!(questions_for(Track::Advanced)[0].id(), "adv-1");
    }
}
