//! Property tests: for any sequence of repository writes, reads match a
//! plain model and the remote matches the local store once pushes settle.

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use strengthlog_core::{convert_all, NetworkWorkout, WorkoutDao, WorkoutTable};
use strengthlog_sync::{
    BackgroundScope, DefaultWorkoutRepository, FakeNetworkDataSource, WorkoutRepository,
};
use strengthlog_testkit::{text_strategy, PropTestConfig};

#[derive(Debug, Clone)]
enum Write {
    Create { title: String, description: String },
    Update { pick: usize, title: String },
    Complete(usize),
    Activate(usize),
    Delete(usize),
    ClearCompleted,
}

fn write_strategy() -> impl Strategy<Value = Write> {
    prop_oneof![
        3 => (text_strategy(), text_strategy())
            .prop_map(|(title, description)| Write::Create { title, description }),
        1 => (any::<usize>(), text_strategy()).prop_map(|(pick, title)| Write::Update { pick, title }),
        2 => any::<usize>().prop_map(Write::Complete),
        1 => any::<usize>().prop_map(Write::Activate),
        1 => any::<usize>().prop_map(Write::Delete),
        1 => Just(Write::ClearCompleted),
    ]
}

/// (title, description, completed) by id.
type Model = BTreeMap<String, (String, String, bool)>;

fn pick(model: &Model, n: usize) -> Option<String> {
    if model.is_empty() {
        return None;
    }
    model.keys().nth(n % model.len()).cloned()
}

async fn run(writes: Vec<Write>) -> Result<(), TestCaseError> {
    let network = Arc::new(FakeNetworkDataSource::new());
    let table = Arc::new(WorkoutTable::in_memory().unwrap());
    let repository =
        DefaultWorkoutRepository::new(network.clone(), table.clone(), BackgroundScope::current());
    let mut model = Model::new();

    for write in writes {
        match write {
            Write::Create { title, description } => {
                let id = repository.create_workout(&title, &description).await.unwrap();
                prop_assert!(!model.contains_key(&id));
                model.insert(id, (title, description, false));
            }
            Write::Update { pick: n, title } => {
                if let Some(id) = pick(&model, n) {
                    repository.update_workout(&id, &title, "updated").await.unwrap();
                    let entry = model.get_mut(&id).unwrap();
                    entry.0 = title;
                    entry.1 = "updated".to_string();
                }
            }
            Write::Complete(n) => {
                if let Some(id) = pick(&model, n) {
                    repository.complete_workout(&id).await.unwrap();
                    model.get_mut(&id).unwrap().2 = true;
                }
            }
            Write::Activate(n) => {
                if let Some(id) = pick(&model, n) {
                    repository.activate_workout(&id).await.unwrap();
                    model.get_mut(&id).unwrap().2 = false;
                }
            }
            Write::Delete(n) => {
                if let Some(id) = pick(&model, n) {
                    repository.delete_workout(&id).await.unwrap();
                    model.remove(&id);
                }
            }
            Write::ClearCompleted => {
                repository.clear_completed_workouts().await.unwrap();
                model.retain(|_, entry| !entry.2);
            }
        }
        // Pushes are unordered among themselves; settle each before the next write.
        prop_assert_eq!(repository.scope().drain(Duration::from_secs(5)).await, 0);
    }

    let workouts = repository.get_workouts(false).await.unwrap();
    prop_assert_eq!(workouts.len(), model.len());
    for workout in &workouts {
        let (title, description, completed) = &model[&workout.id];
        prop_assert_eq!(&workout.title, title);
        prop_assert_eq!(&workout.description, description);
        prop_assert_eq!(workout.is_completed, *completed);
    }

    let expected: Vec<NetworkWorkout> = convert_all(table.get_all().unwrap());
    prop_assert_eq!(network.workouts(), Some(expected));
    Ok(())
}

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn writes_match_model_and_remote_converges(
        writes in prop::collection::vec(write_strategy(), 1..24)
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(run(writes))?;
    }
}
