mod common;

use common::fixtures::{constitutional_principles, default_engine, weekday_request};
use eara_planner::eara::config::ScheduleConfig;
use eara_planner::eara::engine::{GeneratedPlan, PlanRequest};
use eara_planner::eara::types::CycleTag;

#[test]
fn pt_serialization_roundtrip() {
    let config = ScheduleConfig::default();
    let encoded = serde_json::to_string(&config).expect("serialize config");
    let decoded: ScheduleConfig = serde_json::from_str(&encoded).expect("deserialize config");
    assert_eq!(decoded.intervals.reviews, config.intervals.reviews);
    assert_eq!(decoded.durations.practice_percent, config.durations.practice_percent);

    let request = weekday_request(vec![constitutional_principles()]);
    let encoded_request = serde_json::to_string(&request).expect("serialize request");
    let decoded_request: PlanRequest =
        serde_json::from_str(&encoded_request).expect("deserialize request");
    assert_eq!(decoded_request.topics, request.topics);
    assert_eq!(decoded_request.start_date, request.start_date);
}

#[test]
fn plan_json_uses_camel_case_and_cycle_labels() {
    let plan = default_engine()
        .generate(&weekday_request(vec![constitutional_principles()]))
        .expect("plan");
    let value = serde_json::to_value(&plan).expect("serialize plan");

    let first = &value["entries"][0];
    assert_eq!(first["orderIndex"], 1);
    assert_eq!(first["date"], "2024-03-04");
    assert_eq!(first["session"]["cycleTag"], "study");
    assert_eq!(first["session"]["sequenceIndex"], 1);
    assert_eq!(value["entries"][2]["session"]["cycleTag"], "review1");
    assert_eq!(value["warnings"][0]["kind"], "highIncidenceOverrepresented");

    let decoded: GeneratedPlan = serde_json::from_value(value).expect("deserialize plan");
    assert_eq!(decoded.entries[4].session.cycle_tag, CycleTag::Review(3));
    assert_eq!(decoded, plan);
}
