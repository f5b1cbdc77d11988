//! Interactive mode: the list is re-rendered on every change from the
//! server while typed commands add and delete bookmarks.

use std::io::Write;

use client::{
    views::{AddBookmarkForm, BookmarkList},
    SessionClient,
};
use futures::future::{self, Either};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};

use crate::{
    commands::{self, Command, HELP},
    output,
};

enum Step {
    Changed(anyhow::Result<bool>),
    Input(Option<String>),
}

/// Lines typed on stdin. The channel closes at end of input.
pub fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (sender, receiver) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

/// Runs until `quit`, end of input, or the server closing the change stream.
/// Tears the list down on the way out.
pub async fn run<C, W>(
    list: &mut BookmarkList<C>,
    client: &C,
    mut lines: mpsc::UnboundedReceiver<String>,
    out: &mut W,
) -> anyhow::Result<()>
where
    C: SessionClient + ?Sized,
    W: Write,
{
    write!(out, "{}", output::render_list(list.bookmarks()))?;
    writeln!(out, "{HELP}")?;

    loop {
        // Both futures are dropped before the step is handled, so a delete
        // never overlaps an event being applied
        let step = {
            let changed = Box::pin(list.next_event());
            let input = Box::pin(lines.recv());
            match future::select(changed, input).await {
                Either::Left((changed, _)) => Step::Changed(changed),
                Either::Right((line, _)) => Step::Input(line),
            }
        };

        match step {
            Step::Changed(Ok(true)) => write!(out, "{}", output::render_list(list.bookmarks()))?,
            Step::Changed(Ok(false)) => {
                writeln!(out, "Change stream closed")?;
                break;
            }
            Step::Changed(Err(err)) => {
                list.teardown();
                return Err(err);
            }
            Step::Input(None) => break,
            Step::Input(Some(line)) => match commands::parse(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(Command::Help)) => writeln!(out, "{HELP}")?,
                Ok(Some(Command::List)) => write!(out, "{}", output::render_list(list.bookmarks()))?,
                Ok(Some(Command::Delete(id))) => match list.delete(&id).await {
                    Ok(()) => write!(out, "{}", output::render_list(list.bookmarks()))?,
                    Err(err) => writeln!(out, "{err}")?,
                },
                Ok(Some(Command::Add { url, title })) => {
                    let mut form = AddBookmarkForm::default();
                    form.title = title;
                    form.url = url;
                    // On success the row shows up through the change stream
                    if form.submit(client).await.is_none() {
                        writeln!(out, "{}", form.error().unwrap_or("Failed to save bookmark"))?;
                    }
                }
                Err(err) => writeln!(out, "{err}")?,
            },
        }
    }

    list.teardown();
    Ok(())
}
