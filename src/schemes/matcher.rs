use super::types::{Choice, Eligibility, Gender, SchemeRecord, UserProfile, ALL, ANY};

impl UserProfile {
    /// Whether a scheme's eligibility bounds admit this profile.
    ///
    /// Records with malformed bounds or missing filter fields never match.
    pub fn admits(&self, record: &SchemeRecord) -> bool {
        match record.eligibility() {
            Some(e) => self.admits_bounds(&e),
            None => false,
        }
    }

    fn admits_bounds(&self, e: &Eligibility<'_>) -> bool {
        let age = i64::from(self.age);
        let income = i64::try_from(self.income).unwrap_or(i64::MAX);

        let age_ok = e.min_age <= age && age <= e.max_age;
        let gender_ok =
            e.gender == ANY || self.gender == Gender::Any || e.gender == self.gender.label();
        let state_ok = e.state == ALL
            || match &self.state {
                Choice::All => true,
                Choice::Only(state) => e.state == state,
            };
        let income_ok = e.min_income <= income && income <= e.max_income;
        let category_ok = match &self.category {
            Choice::All => true,
            Choice::Only(category) => e.category == category,
        };

        age_ok && gender_ok && state_ok && income_ok && category_ok
    }
}

/// Schemes the profile is eligible for, in corpus order.
pub fn matching<'a>(profile: &UserProfile, records: &'a [SchemeRecord]) -> Vec<&'a SchemeRecord> {
    records.iter().filter(|r| profile.admits(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scheme(name: &str) -> SchemeRecord {
        let mut r = SchemeRecord::named(name);
        r.category = Some("Health".into());
        r.target_state = Some("All".into());
        r.target_gender = Some("Any".into());
        r
    }

    fn adult_scheme() -> SchemeRecord {
        let mut r = scheme("Adult Health Cover");
        r.min_age = json!(18);
        r.max_age = json!(60);
        r
    }

    fn profile(age: u32) -> UserProfile {
        UserProfile {
            age,
            ..Default::default()
        }
    }

    #[test]
    fn test_age_bounds_inclusive() {
        let r = adult_scheme();
        assert!(!profile(17).admits(&r));
        assert!(profile(18).admits(&r));
        assert!(profile(60).admits(&r));
        assert!(!profile(61).admits(&r));
    }

    #[test]
    fn test_state_all_sentinels() {
        let everywhere = scheme("Everywhere");
        let mut kerala_only = scheme("Kerala Only");
        kerala_only.target_state = Some("Kerala".into());

        let mut p = profile(30);
        p.state = Choice::Only("Bihar".into());
        assert!(p.admits(&everywhere));
        assert!(!p.admits(&kerala_only));

        p.state = Choice::Only("Kerala".into());
        assert!(p.admits(&kerala_only));

        p.state = Choice::All;
        assert!(p.admits(&kerala_only));
        assert!(p.admits(&everywhere));
    }

    #[test]
    fn test_gender_matching() {
        let mut women = scheme("Lakhpati Didi");
        women.target_gender = Some("Female".into());

        let mut p = profile(30);
        p.gender = Gender::Male;
        assert!(!p.admits(&women));
        p.gender = Gender::Female;
        assert!(p.admits(&women));
        p.gender = Gender::Any;
        assert!(p.admits(&women));
    }

    #[test]
    fn test_income_and_category() {
        let mut r = scheme("PM SVANidhi");
        r.category = Some("Entrepreneurship".into());
        r.max_income = json!("300000");

        let mut p = profile(40);
        p.income = 250_000;
        assert!(p.admits(&r));
        p.income = 300_001;
        assert!(!p.admits(&r));

        p.income = 0;
        p.category = Choice::Only("Health".into());
        assert!(!p.admits(&r));
        p.category = Choice::Only("Entrepreneurship".into());
        assert!(p.admits(&r));
    }

    #[test]
    fn test_non_numeric_min_income_never_matches() {
        let mut r = scheme("Broken");
        r.min_income = json!("Information not found");
        let p = UserProfile::default();
        assert!(!p.admits(&r));

        let mut wide = p.clone();
        wide.age = 50;
        wide.income = 1_000;
        assert!(!wide.admits(&r));
    }

    #[test]
    fn test_missing_filter_field_never_matches() {
        let mut r = scheme("No Gender");
        r.target_gender = None;
        assert!(!profile(30).admits(&r));
    }

    #[test]
    fn test_matching_is_ordered_subset() {
        let mut young = scheme("Youth");
        young.max_age = json!(25);
        let records = vec![scheme("A"), young, scheme("B"), scheme("A")];

        let hits = matching(&profile(40), &records);
        let names: Vec<_> = hits.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "A"]);
        assert!(hits.iter().all(|h| records.iter().any(|r| std::ptr::eq(r, *h))));
    }
}
