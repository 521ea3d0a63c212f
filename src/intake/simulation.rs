/***************************************/
/*        3rd party libraries          */
/***************************************/
use log::{info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::dispatcher::Dispatcher;
use crate::shared::FloorRegistry;

/// Random (origin, destination) pairs, never the same floor twice.
pub fn generate_requests<R: Rng>(
    floors: &FloorRegistry,
    n_users: usize,
    rng: &mut R,
) -> Vec<(String, String)> {
    if floors.len() < 2 {
        return Vec::new();
    }

    let names = floors.names();
    (0..n_users)
        .map(|_| {
            let origin = rng.gen_range(0..names.len());
            let mut destination = rng.gen_range(0..names.len() - 1);
            if destination >= origin {
                destination += 1;
            }
            (names[origin].clone(), names[destination].clone())
        })
        .collect()
}

/// Submits `n_users` random requests. Returns how many were accepted.
pub fn simulate_users(dispatcher: &Dispatcher, n_users: usize, seed: Option<u64>) -> usize {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let requests = generate_requests(dispatcher.floors(), n_users, &mut rng);
    if requests.len() < n_users {
        warn!("A building with a single floor has no requests to simulate");
    }

    let mut submitted = 0;
    for (origin, destination) in requests {
        info!("User request: From {} to {}", origin, destination);
        match dispatcher.submit_request(&origin, &destination) {
            Ok(()) => submitted += 1,
            Err(e) => warn!("Simulated request rejected: {}", e),
        }
    }
    submitted
}
