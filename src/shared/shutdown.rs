/***************************************/
/*        3rd party libraries          */
/***************************************/
use crossbeam_channel as cbc;
use std::sync::Mutex;

/**
 * Cooperative cancellation for the dispatcher and elevator loops.
 *
 * Nothing is ever sent on the channel. Firing the trigger drops the only
 * sender, which disconnects every token: loops see it at the top of their
 * next iteration, and loops blocked in `cbc::select!` on `receiver()` wake
 * up immediately.
 */
pub struct ShutdownTrigger {
    tx: Mutex<Option<cbc::Sender<()>>>,
}

#[derive(Clone)]
pub struct ShutdownToken {
    rx: cbc::Receiver<()>,
}

pub fn channel() -> (ShutdownTrigger, ShutdownToken) {
    let (tx, rx) = cbc::bounded::<()>(0);
    (
        ShutdownTrigger {
            tx: Mutex::new(Some(tx)),
        },
        ShutdownToken { rx },
    )
}

impl ShutdownTrigger {
    /// Returns true only for the call that actually fired.
    pub fn fire(&self) -> bool {
        crate::lock!(self.tx).take().is_some()
    }
}

impl ShutdownToken {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.rx.try_recv(), Err(cbc::TryRecvError::Disconnected))
    }

    pub fn receiver(&self) -> &cbc::Receiver<()> {
        &self.rx
    }
}
