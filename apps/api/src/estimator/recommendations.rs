use crate::estimator::report::Recommendation;

const BASIC: [(&str, &str, &str, u8); 3] = [
    (
        "Optimize housing costs",
        "Look for shared housing options to reduce expenses.",
        "cost_optimization",
        1,
    ),
    (
        "Explore scholarships and grants",
        "Research scholarships available to international students.",
        "funding",
        2,
    ),
    (
        "Part-time work",
        "Consider part-time work to generate additional income.",
        "income_generation",
        3,
    ),
];

/// The three recommendations every report carries, highest priority first.
pub fn basic_recommendations() -> Vec<Recommendation> {
    BASIC
        .iter()
        .map(|&(title, description, category, priority)| Recommendation {
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            priority,
        })
        .collect()
}
