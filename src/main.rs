//! Dynamic Toss entry point
//!
//! Replays a scripted drag through the interaction core and prints one
//! JSON snapshot per rendered frame, standing in for a presentation layer.
//!
//! Usage: `dynamic-toss [settings.json] [--easing NAME] [--write-settings PATH]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Dynamic Toss (native) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Embedders drive `TossController` directly on the web
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), dynamic_toss::TossError> {
    use dynamic_toss::{
        ControllerEvent, Easing, GestureEvent, Pose, TossController, TossError, TossSettings,
    };
    use glam::Vec2;

    /// Simulated display refresh
    const FRAME_DT: f32 = 1.0 / 60.0;

    let mut settings_path = None;
    let mut easing = None;
    let mut write_to = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--easing" => {
                let name = args.next().unwrap_or_default();
                let parsed = Easing::from_str(&name).ok_or_else(|| {
                    TossError::InvalidSettings(format!("unknown easing {name:?}"))
                })?;
                easing = Some(parsed);
            }
            "--write-settings" => write_to = args.next(),
            _ => settings_path = Some(arg),
        }
    }

    let mut settings = match settings_path {
        Some(path) => TossSettings::load(path)?,
        None => TossSettings::default(),
    };
    if let Some(easing) = easing {
        settings.reset_easing = easing;
    }
    log::info!("Reset easing: {}", settings.reset_easing.as_str());
    if let Some(path) = write_to {
        settings.save(path)?;
    }

    let home = Pose::new(Vec2::new(160.0, 240.0), Vec2::new(120.0, 120.0));
    let mut controller = TossController::new(home, settings)?;
    log::info!("Spin seed: {:#x}", controller.seed());

    // Grab near the corner, drag right, then flick hard up and right
    let mut script: Vec<(u32, GestureEvent)> = vec![(
        10,
        GestureEvent::Begin {
            pointer: Vec2::new(190.0, 270.0),
        },
    )];
    for i in 1..=12u16 {
        let pointer = Vec2::new(190.0 + f32::from(i) * 12.0, 270.0 - f32::from(i) * 6.0);
        script.push((10 + u32::from(i), GestureEvent::Update { pointer }));
    }
    script.push((
        23,
        GestureEvent::End {
            pointer: Vec2::new(340.0, 196.0),
            velocity: Vec2::new(1600.0, -900.0),
        },
    ));

    let total_frames = ((settings_span(&controller) + 1.0) / FRAME_DT).ceil() as u32;
    let mut script = script.into_iter().peekable();

    for frame in 0..total_frames {
        while let Some((_, event)) = script.next_if(|(at, _)| *at == frame) {
            if let Some(decision) = controller.handle(event)? {
                log::info!("Release decision: {decision:?}");
            }
        }

        controller.advance(FRAME_DT);

        for event in controller.drain_events() {
            if event == ControllerEvent::ResetFinished {
                log::info!("Back home after {:.2}s", controller.now());
            }
        }

        let json = serde_json::to_string(&controller.snapshot())?;
        println!("{json}");
    }

    Ok(())
}

/// Seconds of simulation needed to see a full toss and the ease home
#[cfg(not(target_arch = "wasm32"))]
fn settings_span(controller: &dynamic_toss::TossController) -> f32 {
    let s = controller.settings();
    s.toss_duration + s.reset_duration
}
