//! Geo Quest checker
//!
//! Native: reads one JSON request on stdin and prints the verdict as JSON.
//!
//! ```text
//! {"points": {"A": {"x": 0, "y": 0}, ...}, "target": "square", "difficulty": "strict"}
//! {"selected": [1, 3, 5], "correct": [1, 3, 5, 6]}
//! {"polygon": 6}
//! {"polygon": 6, "ask": "sum", "seed": 3}
//! {"polygon": 6, "ask": "sum", "seed": 3, "answer": 2}
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::collections::BTreeMap;
    use std::io::Read;

    use serde::Deserialize;

    use geo_quest::Difficulty;
    use geo_quest::geometry::{self, AngleAsk, AngleQuestion, Point, QuadTarget};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Request {
        Construct {
            points: BTreeMap<String, Point>,
            target: String,
            #[serde(default)]
            difficulty: Option<String>,
        },
        Select {
            selected: Vec<u32>,
            correct: Vec<u32>,
        },
        Polygon {
            polygon: u32,
            /// "sum" or "each_interior": also build the multiple-choice question
            #[serde(default)]
            ask: Option<String>,
            #[serde(default)]
            seed: Option<u64>,
            /// Option index to check against the question
            #[serde(default)]
            answer: Option<usize>,
        },
    }

    fn handle(request: Request) -> Result<serde_json::Value, String> {
        match request {
            Request::Construct {
                points,
                target,
                difficulty,
            } => {
                let target =
                    QuadTarget::parse(&target).ok_or_else(|| format!("Unknown target shape: {target}"))?;
                let difficulty = match difficulty {
                    Some(d) => Difficulty::parse(&d).ok_or_else(|| format!("Unknown difficulty: {d}"))?,
                    None => Difficulty::default(),
                };
                log::info!("Classifying {} ({})", target.as_str(), difficulty.as_str());
                let result = geometry::classify_points(&points, target, &difficulty.validator());
                serde_json::to_value(result).map_err(|e| e.to_string())
            }
            Request::Select { selected, correct } => {
                serde_json::to_value(geometry::classify_selection(&selected, &correct))
                    .map_err(|e| e.to_string())
            }
            Request::Polygon {
                polygon,
                ask,
                seed,
                answer,
            } => {
                let mut response = serde_json::json!({
                    "sides": polygon,
                    "name": geometry::polygon::polygon_name(polygon),
                    "angle_sum": geometry::angle_sum(polygon),
                    "interior_angle": geometry::regular_interior_angle(polygon),
                });
                let Some(ask) = ask else {
                    if answer.is_some() {
                        return Err("An answer needs an \"ask\" to check against".to_string());
                    }
                    return Ok(response);
                };
                let ask = AngleAsk::parse(&ask).ok_or_else(|| format!("Unknown angle question: {ask}"))?;
                let question = AngleQuestion::from_seed(polygon, ask, seed.unwrap_or(0));
                if let Some(choice) = answer {
                    response["correct"] = serde_json::Value::Bool(question.check(choice));
                }
                response["question"] = serde_json::to_value(question).map_err(|e| e.to_string())?;
                Ok(response)
            }
        }
    }

    pub fn run() -> Result<(), String> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| format!("Failed to read stdin: {e}"))?;
        let request: Request =
            serde_json::from_str(&input).map_err(|e| format!("Invalid request: {e}"))?;

        let response = handle(request)?;
        let out = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
        println!("{out}");
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn run_json(json: &str) -> Result<serde_json::Value, String> {
            handle(serde_json::from_str(json).map_err(|e| e.to_string())?)
        }

        #[test]
        fn test_polygon_facts_only() {
            let out = run_json(r#"{"polygon": 6}"#).unwrap();
            assert_eq!(out["angle_sum"], 720.0);
            assert!(out.get("question").is_none());
        }

        #[test]
        fn test_polygon_question_checks_answer() {
            let shown = run_json(r#"{"polygon": 6, "ask": "sum", "seed": 3}"#).unwrap();
            let index = shown["question"]["answer_index"].as_u64().unwrap();
            assert_eq!(shown["question"]["options"][index as usize], 720.0);

            let right = format!(r#"{{"polygon": 6, "ask": "sum", "seed": 3, "answer": {index}}}"#);
            assert_eq!(run_json(&right).unwrap()["correct"], true);

            let wrong = format!(r#"{{"polygon": 6, "ask": "sum", "seed": 3, "answer": {}}}"#, (index + 1) % 4);
            assert_eq!(run_json(&wrong).unwrap()["correct"], false);
        }

        #[test]
        fn test_polygon_answer_without_ask_is_error() {
            assert!(run_json(r#"{"polygon": 6, "answer": 1}"#).is_err());
            assert!(run_json(r#"{"polygon": 6, "ask": "exterior"}"#).is_err());
        }

        #[test]
        fn test_selection_request() {
            let out = run_json(r#"{"selected": [1, 3, 5], "correct": [1, 3, 5, 6]}"#).unwrap();
            assert_eq!(out["is_exact_match"], false);
            assert_eq!(out["correct_count"], 3);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point lives in `geo_quest::web`
}
