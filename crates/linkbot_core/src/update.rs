use bot_logging::{bot_debug, bot_info};

use crate::{
    parse_command, render_markdown, split_message, AppState, Category, Command, Effect,
    IngestFailure, Link, Msg, Origin, Reply, StoreFailure, HELP_TEXT, MAX_REPLY_LEN,
    WELCOME_TEXT,
};

const NO_COLLECTION_TEXT: &str =
    "You have no collection yet. Create one with \"new collection <name>\".";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Inbound { origin, text } => handle_command(&mut state, origin, parse_command(&text)),
        Msg::TitleFetched {
            origin,
            url,
            result,
        } => match result {
            Ok(title) => {
                // A second URL before classification silently replaces the first.
                if let Some(previous) = state
                    .pending_mut()
                    .stage(origin.user_id, Link::unclassified(url, title.clone()))
                {
                    bot_debug!(
                        "Replaced pending link {} of user {}",
                        previous.url,
                        origin.user_id
                    );
                }
                vec![reply(
                    Reply::text(
                        origin.chat_id,
                        format!("Ready to save: \"{title}\".\nWhat category should it be?"),
                    )
                    .with_keyboard(Category::names()),
                )]
            }
            Err(IngestFailure::Fetch(reason)) => vec![reply(Reply::text(
                origin.chat_id,
                format!("Could not fetch {url}: {reason}"),
            ))],
            Err(IngestFailure::MissingTitle) => vec![reply(Reply::text(
                origin.chat_id,
                format!("Could not find a title at {url}."),
            ))],
        },
        Msg::CollectionReset {
            origin,
            name,
            result,
        } => {
            let text = match result {
                Ok(()) => format!("New collection created with name: {name}"),
                Err(_) => "Could not create the collection right now. Please try again.".into(),
            };
            vec![reply(Reply::text(origin.chat_id, text))]
        }
        Msg::LinkSaved {
            origin,
            link,
            result,
        } => match result {
            Ok(()) => {
                let category = link.category.map(Category::name).unwrap_or_default();
                vec![reply(Reply::text(
                    origin.chat_id,
                    format!("Saved link into {category}: {}", link.title),
                ))]
            }
            Err(failure) => {
                // Give the link back so the user can classify it again.
                state.pending_mut().restage(origin.user_id, link);
                let text = match failure {
                    StoreFailure::NotFound => format!(
                        "{NO_COLLECTION_TEXT} Then pick the category again."
                    ),
                    StoreFailure::Unavailable(_) => {
                        "Could not save the link right now. Pick the category again to retry."
                            .to_string()
                    }
                };
                vec![reply(
                    Reply::text(origin.chat_id, text).with_keyboard(Category::names()),
                )]
            }
        },
        Msg::CollectionLoaded {
            origin,
            mode,
            result,
        } => match result {
            Ok(collection) => {
                let document = render_markdown(&collection.links);
                split_message(&document, MAX_REPLY_LEN)
                    .into_iter()
                    .map(|chunk| reply(Reply::text(origin.chat_id, chunk).with_format(mode.into())))
                    .collect()
            }
            Err(StoreFailure::NotFound) => {
                vec![reply(Reply::text(origin.chat_id, NO_COLLECTION_TEXT))]
            }
            Err(StoreFailure::Unavailable(_)) => vec![reply(Reply::text(
                origin.chat_id,
                "Could not load your collection right now. Please try again.",
            ))],
        },
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn handle_command(state: &mut AppState, origin: Origin, command: Command) -> Vec<Effect> {
    bot_info!("Inbound {} from user {}", command.kind(), origin.user_id);
    match command {
        Command::Start => vec![reply(Reply::text(origin.chat_id, WELCOME_TEXT))],
        Command::Help => vec![reply(Reply::text(origin.chat_id, HELP_TEXT))],
        Command::NewCollection(name) => vec![Effect::ResetCollection { origin, name }],
        Command::IngestUrl(url) => vec![Effect::FetchTitle { origin, url }],
        Command::Classify(category) => match state.pending_mut().take(origin.user_id) {
            Some(link) => vec![Effect::AppendLink {
                origin,
                link: link.classified(category),
            }],
            None => vec![reply(Reply::text(
                origin.chat_id,
                "There is no link waiting for a category. Send me a link first.",
            ))],
        },
        Command::Render(mode) => vec![Effect::LoadCollection { origin, mode }],
        Command::Unrecognized => vec![reply(Reply::text(
            origin.chat_id,
            "Send me a link, or type \"generate markdown\" to see your collection.",
        ))],
    }
}

fn reply(reply: Reply) -> Effect {
    Effect::Reply(reply)
}
