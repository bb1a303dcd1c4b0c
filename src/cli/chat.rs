//! Line-reading front end for the interactive conversation.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::core::turn::{TurnController, TurnOutcome};
use crate::ui::console::Console;

const PROMPT: &str = "> ";

pub fn print_banner(console: &Console) -> io::Result<()> {
    console.println("==================== Doubao multi-turn chat ====================")?;
    console.println("Type q/quit to exit, clear to reset the conversation context.")?;
    console.println("================================================================")
}

/// Feed lines from `input` to the controller until the user quits or the
/// input ends.
pub async fn run_chat<R>(
    mut controller: TurnController,
    console: &Console,
    mut input: R,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    print_banner(console)?;

    let mut raw = Vec::new();
    loop {
        controller.await_input();
        console.print(PROMPT)?;

        raw.clear();
        if input.read_until(b'\n', &mut raw).await? == 0 {
            debug!("input closed");
            console.println("")?;
            break;
        }

        let line = match std::str::from_utf8(&raw) {
            Ok(line) => line,
            Err(err) => {
                warn!("discarding input line: {err}");
                console.println("[error] Input is not valid UTF-8, please try again.")?;
                continue;
            }
        };

        if let TurnOutcome::Exit = controller.handle_input(line).await {
            break;
        }
    }

    Ok(())
}
