use evented::*;

// Define your event
#[derive(Event)]
struct Greeting {
    state: EventState<Greeting>,
    name: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // Create the event type
    let greeted = EventType::<Greeting>::builder("greeted").build();

    // Register callbacks; they run in the order they were added
    greeted.add_fn(|g: &mut Greeting| {
        println!("Hello, {}!", g.name);
        Ok(())
    });
    greeted.add_fn(|g: &mut Greeting| {
        println!("Nice to meet you, {}.", g.name);
        Ok(())
    });

    // Trigger it
    greeted.trigger_with(|ty| Greeting {
        state: EventState::new(ty),
        name: "World".into(),
    })?;
    Ok(())
}
