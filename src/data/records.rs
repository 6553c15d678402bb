use std::collections::HashMap;

#[derive(Clone, Debug)]
pub struct PassRecord {
    pub team_id: String,
    pub team_name: String,
    pub game_date: String,
    pub source_id: String,
    pub source_name: String,
    pub target_id: String,
    pub target_name: String,
    pub passes: u32,
    pub assists: u32,
}

#[derive(Clone, Debug)]
pub struct TeamEntry {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct PassDataset {
    pub records: Vec<PassRecord>,
    teams: Vec<TeamEntry>,
    dates: Vec<String>,
}

impl PassDataset {
    pub fn from_records(records: Vec<PassRecord>) -> Self {
        let mut team_names: HashMap<&str, &str> = HashMap::new();
        let mut dates = Vec::new();

        for record in &records {
            if !record.team_id.is_empty() {
                team_names.entry(&record.team_id).or_insert(&record.team_name);
            }
            if !record.game_date.is_empty() {
                dates.push(record.game_date.clone());
            }
        }

        let mut teams = team_names
            .into_iter()
            .map(|(id, name)| TeamEntry {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect::<Vec<_>>();
        teams.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        dates.sort();
        dates.dedup();

        Self {
            records,
            teams,
            dates,
        }
    }

    pub fn teams(&self) -> &[TeamEntry] {
        &self.teams
    }

    pub fn team_name(&self, team_id: &str) -> Option<&str> {
        self.teams
            .iter()
            .find(|team| team.id == team_id)
            .map(|team| team.name.as_str())
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    // Game dates are ISO strings, so the window comparison is lexicographic.
    pub fn filtered<'a>(
        &'a self,
        team_id: &'a str,
        start_date: Option<&'a str>,
        end_date: Option<&'a str>,
    ) -> impl Iterator<Item = &'a PassRecord> + 'a {
        self.records.iter().filter(move |record| {
            if !team_id.is_empty() && record.team_id != team_id {
                return false;
            }
            if let Some(start) = start_date
                && record.game_date.as_str() < start
            {
                return false;
            }
            if let Some(end) = end_date
                && record.game_date.as_str() > end
            {
                return false;
            }
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(team: &str, date: &str, source: &str, target: &str) -> PassRecord {
        PassRecord {
            team_id: team.to_string(),
            team_name: format!("Team {team}"),
            game_date: date.to_string(),
            source_id: source.to_string(),
            source_name: String::new(),
            target_id: target.to_string(),
            target_name: String::new(),
            passes: 1,
            assists: 0,
        }
    }

    #[test]
    fn teams_are_unique_and_sorted_by_name() {
        let dataset = PassDataset::from_records(vec![
            record("2", "2024-01-01", "a", "b"),
            record("1", "2024-01-02", "a", "b"),
            record("2", "2024-01-03", "a", "b"),
        ]);

        let ids = dataset
            .teams()
            .iter()
            .map(|team| team.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn dates_are_deduped_and_sorted() {
        let dataset = PassDataset::from_records(vec![
            record("1", "2024-01-03", "a", "b"),
            record("1", "2024-01-01", "a", "b"),
            record("1", "2024-01-03", "a", "b"),
        ]);

        assert_eq!(dataset.dates(), ["2024-01-01", "2024-01-03"]);
    }

    #[test]
    fn filter_window_is_inclusive_on_both_ends() {
        let dataset = PassDataset::from_records(vec![
            record("1", "2024-01-01", "a", "b"),
            record("1", "2024-01-02", "a", "b"),
            record("1", "2024-01-03", "a", "b"),
        ]);

        let window = dataset
            .filtered("1", Some("2024-01-01"), Some("2024-01-02"))
            .count();
        assert_eq!(window, 2);
    }

    #[test]
    fn filter_excludes_other_teams() {
        let dataset = PassDataset::from_records(vec![
            record("1", "2024-01-01", "a", "b"),
            record("2", "2024-01-01", "a", "b"),
        ]);

        assert_eq!(dataset.filtered("1", None, None).count(), 1);
        // An empty team id means no team restriction.
        assert_eq!(dataset.filtered("", None, None).count(), 2);
    }
}
