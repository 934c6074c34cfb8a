use std::fs;
use std::path::Path;

use serde_json::json;

use ncov::{CaseCounts, FeedError, LogProgress, NameMapping, Tables, ARTIFACTS, CHINA};


fn envelope(payload: serde_json::Value) -> String {
	json!({"ret": 0, "data": payload.to_string()}).to_string()
}

fn write_fixtures(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
	let domestic = envelope(json!({
		"lastUpdateTime": "2022-11-20 14:33:00",
		"chinaTotal": {"confirm": 70100},
		"areaTree": [{
			"name": "中国",
			"today": {"confirm": 12},
			"total": {"nowConfirm": 999, "confirm": 70100, "heal": 64400, "dead": 4620, "deadRate": "6.59"},
			"children": [
				{"name": "湖北", "total": {"confirm": 68000, "heal": 63000, "dead": 4500}, "children": []},
				{"name": "北京", "total": {"confirm": 1500, "heal": 1000, "dead": 0}},
				{"name": "广东", "total": {"confirm": 600, "heal": 400, "dead": 120}},
			],
		}],
	}));
	let foreign = envelope(json!({
		"foreignList": [
			{"name": "美国", "nowConfirm": 777, "confirm": 1000, "heal": 400, "dead": 100, "continent": "北美洲"},
			{"name": "Atlantis", "nowConfirm": 3, "confirm": 10, "heal": 5, "dead": 2},
			{"name": "日本", "nowConfirm": 0, "confirm": 100, "heal": 100, "dead": 0},
		],
		"globalStatis": {"nowConfirm": 780},
	}));
	let d = dir.join("domestic.json");
	let f = dir.join("foreign.json");
	fs::write(&d, domestic).unwrap();
	fs::write(&f, foreign).unwrap();
	(d, f)
}

#[test]
fn offline_pipeline_end_to_end() {
	let dir = tempfile::tempdir().unwrap();
	let (d, f) = write_fixtures(dir.path());
	let (domestic, international) = ncov::load_snapshots(&d, &f).unwrap();

	assert_eq!(domestic.regions.len(), 3);
	assert_eq!(domestic.regions[0].current_active, 500);
	// the feed's own nowConfirm is ignored for the national total as well
	assert_eq!(domestic.china.current_active, 70100 - 64400 - 4620);
	assert_eq!(international.countries[0].current_active, 777);

	let tables = Tables::build(domestic, international, &NameMapping::builtin());
	assert_eq!(tables.world.len(), 4);
	assert_eq!(tables.join.joined.len(), 3);
	assert_eq!(tables.join.gaps.len(), 1);
	assert_eq!(tables.join.gaps[0].as_str(), "Atlantis");
	assert_eq!(tables.join.joined.len() + tables.join.gaps.len(), tables.world.len());

	for r in tables.region_rates.iter() {
		assert!(r.heal_rate <= 1.0 && r.dead_rate > 0.0);
	}
	for r in tables.world_rates.iter() {
		assert!(r.heal_rate < 0.90 && r.dead_rate > 0.0);
		assert_ne!(r.name(), "日本");
	}

	let out = dir.path().join("out");
	let written = ncov::write_artifacts(&tables, &out, &mut LogProgress).unwrap();
	assert_eq!(written.len(), ARTIFACTS.len());

	let international_csv = fs::read_to_string(out.join("international.csv")).unwrap();
	assert!(international_csv.starts_with("country,nowConfirm,confirm,dead,heal\n美国,777,1000,100,400\n"));
	assert!(international_csv.contains(&format!("{},1080,70100,4620,64400", CHINA)));

	let joined_csv = fs::read_to_string(out.join("world_joined.csv")).unwrap();
	assert!(!joined_csv.contains("Atlantis"));
	assert!(joined_csv.contains("United States,美国,777"));

	let world_map = fs::read_to_string(out.join("world_map.html")).unwrap();
	assert!(world_map.contains("\"United States\""));
	assert!(!world_map.contains("Atlantis"));
}

#[test]
fn malformed_snapshot_aborts_with_position() {
	let dir = tempfile::tempdir().unwrap();
	let (d, _) = write_fixtures(dir.path());
	let f = dir.path().join("broken.json");
	fs::write(&f, envelope(json!({"foreignList": [
		{"name": "美国", "nowConfirm": 1, "confirm": 1, "heal": 0, "dead": 0},
		{"name": "法国", "nowConfirm": 1, "confirm": 1, "heal": 0},
	]}))).unwrap();

	match ncov::load_snapshots(&d, &f) {
		Err(FeedError::Malformed(e)) => {
			assert_eq!(e.index, Some(1));
			assert!(e.to_string().contains("entry #1"));
		},
		other => panic!("unexpected result: {:?}", other.map(|_| ())),
	}
}
