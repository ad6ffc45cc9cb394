use std::sync::Arc;

use evented::*;

#[derive(Event)]
struct Withdrawal {
    state: EventState<Withdrawal>,
    amount: u64,
}

impl Withdrawal {
    fn new(ty: &Arc<EventType<Withdrawal>>, amount: u64) -> Self {
        Self {
            state: EventState::new(ty),
            amount,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let withdrawal = EventType::<Withdrawal>::builder("withdrawal")
        .cancellable(true)
        .can_stop_propagation(true)
        .exception_handler(LogFailures)
        .build();

    // Limits check: cancels, but lets auditing callbacks see the event
    withdrawal.add_fn(|w: &mut Withdrawal| {
        if w.amount > 1_000 {
            w.cancel()?;
        }
        Ok(())
    });

    // Fraud check: stops propagation entirely
    withdrawal.add_fn(|w: &mut Withdrawal| {
        if w.amount == 666 {
            w.stop_propagation()?;
        }
        Ok(())
    });

    // Audit log: a failure here is logged, not fatal
    withdrawal.add_fn(|w: &mut Withdrawal| {
        if w.amount == 0 {
            return Err("refusing to audit an empty withdrawal".into());
        }
        println!(
            "audit: {} (cancelled: {})",
            w.amount,
            w.is_cancelled()
        );
        Ok(())
    });

    for amount in [50, 5_000, 666, 0] {
        let w = withdrawal.trigger(Withdrawal::new(&withdrawal, amount))?;
        println!(
            "withdrawal of {amount}: cancelled={}, stopped={}",
            w.is_cancelled(),
            w.is_propagation_stopped()
        );
    }
    Ok(())
}
