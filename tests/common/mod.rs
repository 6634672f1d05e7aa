//! Shared test utilities and fixtures

#![allow(dead_code)]

use piwalk_core::{
    InputSender, OutputReceiver, PiDigits, Program, RunOutcome, ScriptedEntropy, input_channel,
    output_channel,
};

/// Program over the built-in digits with a fixed entropy script.
pub fn program(source: &str, script: &[u32]) -> Program {
    Program::new(PiDigits::default(), source)
        .with_entropy(Box::new(ScriptedEntropy::new(script.iter().copied())))
}

/// Attach an output channel and return its receiving end.
pub fn with_output(program: Program) -> (Program, OutputReceiver) {
    let (tx, rx) = output_channel();
    (program.with_output(tx), rx)
}

/// Everything written so far.
pub fn drain(output: &mut OutputReceiver) -> String {
    let mut text = String::new();
    while let Ok(fragment) = output.try_recv() {
        text.push_str(&fragment);
    }
    text
}

/// Input channel whose requests are answered from `replies` in order. Once
/// the replies run out the responder hangs up.
pub fn scripted_input(replies: &[&str]) -> InputSender {
    let (tx, mut rx) = input_channel(1);
    let mut replies: Vec<String> = replies.iter().map(ToString::to_string).collect();
    replies.reverse();
    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            let Some(reply) = replies.pop() else {
                return;
            };
            let _ = request.respond(reply);
        }
    });
    tx
}

pub async fn run_to_end(program: &mut Program) -> RunOutcome {
    program.run().await.expect("program should not error")
}
