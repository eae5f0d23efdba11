use std::sync::Once;

use linkbot_core::{
    update, AppState, Category, Collection, Effect, IngestFailure, Link, Msg, Origin, Reply,
    ReplyFormat, StoreFailure, UserId,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(bot_logging::initialize_for_tests);
}

fn alice() -> Origin {
    Origin::new(7, 70)
}

fn say(state: AppState, origin: Origin, text: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::Inbound {
            origin,
            text: text.to_string(),
        },
    )
}

fn fetched(state: AppState, origin: Origin, url: &str, title: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::TitleFetched {
            origin,
            url: url.to_string(),
            result: Ok(title.to_string()),
        },
    )
}

fn only_reply(effects: Vec<Effect>) -> Reply {
    match effects.as_slice() {
        [Effect::Reply(reply)] => reply.clone(),
        other => panic!("expected a single reply, got {other:?}"),
    }
}

#[test]
fn start_and_help_reply_without_state_change() {
    init_logging();
    let state = AppState::new();
    let (next, effects) = say(state.clone(), alice(), "/start");
    assert_eq!(next, state);
    assert!(only_reply(effects).text.starts_with("Welcome!"));

    let (_, effects) = say(next, alice(), "/help");
    assert!(only_reply(effects).text.starts_with("Send me a link"));
}

#[test]
fn new_collection_requests_reset_then_confirms() {
    init_logging();
    let (state, effects) = say(AppState::new(), alice(), "new collection Reading List");
    assert_eq!(
        effects,
        vec![Effect::ResetCollection {
            origin: alice(),
            name: "Reading List".to_string(),
        }]
    );

    let (_, effects) = update(
        state,
        Msg::CollectionReset {
            origin: alice(),
            name: "Reading List".to_string(),
            result: Ok(()),
        },
    );
    let reply = only_reply(effects);
    assert!(reply.text.contains("Reading List"));
    assert_eq!(reply.chat_id, alice().chat_id);
}

#[test]
fn url_message_requests_title_fetch_without_staging() {
    init_logging();
    let (state, effects) = say(AppState::new(), alice(), "check this https://example.com/a out");
    assert_eq!(
        effects,
        vec![Effect::FetchTitle {
            origin: alice(),
            url: "https://example.com/a".to_string(),
        }]
    );
    assert_eq!(state.pending_count(), 0);
}

#[test]
fn fetched_title_is_staged_and_prompts_with_keyboard() {
    init_logging();
    let (state, effects) = fetched(AppState::new(), alice(), "https://example.com/a", "Hello World");

    let reply = only_reply(effects);
    assert_eq!(
        reply.text,
        "Ready to save: \"Hello World\".\nWhat category should it be?"
    );
    assert_eq!(reply.keyboard, Some(Category::names()));
    assert_eq!(
        state.pending_link(alice().user_id),
        Some(&Link::unclassified("https://example.com/a", "Hello World"))
    );
}

#[test]
fn fetch_failures_reply_and_leave_pending_untouched() {
    init_logging();
    let (state, _) = fetched(AppState::new(), alice(), "https://ok.example", "Ok");

    let (state, effects) = update(
        state,
        Msg::TitleFetched {
            origin: alice(),
            url: "https://down.example".to_string(),
            result: Err(IngestFailure::Fetch("http status 503".to_string())),
        },
    );
    assert_eq!(
        only_reply(effects).text,
        "Could not fetch https://down.example: http status 503"
    );

    let (state, effects) = update(
        state,
        Msg::TitleFetched {
            origin: alice(),
            url: "https://blank.example".to_string(),
            result: Err(IngestFailure::MissingTitle),
        },
    );
    assert_eq!(
        only_reply(effects).text,
        "Could not find a title at https://blank.example."
    );
    assert_eq!(
        state.pending_link(alice().user_id).map(|l| l.url.as_str()),
        Some("https://ok.example")
    );
}

#[test]
fn category_classifies_pending_link_and_clears_it() {
    init_logging();
    let (state, _) = fetched(AppState::new(), alice(), "https://example.com/a", "Hello World");
    let (state, effects) = say(state, alice(), "Articles & News");

    assert_eq!(
        effects,
        vec![Effect::AppendLink {
            origin: alice(),
            link: Link::unclassified("https://example.com/a", "Hello World")
                .classified(Category::ArticlesAndNews),
        }]
    );
    assert_eq!(state.pending_link(alice().user_id), None);

    let (_, effects) = update(
        state,
        Msg::LinkSaved {
            origin: alice(),
            link: Link::unclassified("https://example.com/a", "Hello World")
                .classified(Category::ArticlesAndNews),
            result: Ok(()),
        },
    );
    assert_eq!(
        only_reply(effects).text,
        "Saved link into Articles & News: Hello World"
    );
}

#[test]
fn category_without_pending_link_is_a_handled_error() {
    init_logging();
    let (state, effects) = say(AppState::new(), alice(), "Releases");
    assert_eq!(
        only_reply(effects).text,
        "There is no link waiting for a category. Send me a link first."
    );
    assert_eq!(state.pending_count(), 0);
}

#[test]
fn second_url_replaces_first_pending_link() {
    init_logging();
    let (state, _) = fetched(AppState::new(), alice(), "https://first.example", "First");
    let (state, _) = fetched(state, alice(), "https://second.example", "Second");
    let (state, effects) = say(state, alice(), "Releases");

    match effects.as_slice() {
        [Effect::AppendLink { link, .. }] => {
            assert_eq!(link.url, "https://second.example");
            assert_eq!(link.category, Some(Category::Releases));
        }
        other => panic!("unexpected effects {other:?}"),
    }

    // The first link is gone for good.
    let (_, effects) = say(state, alice(), "Releases");
    assert!(matches!(effects.as_slice(), [Effect::Reply(_)]));
}

#[test]
fn failed_save_gives_link_back_for_another_try() {
    init_logging();
    let link = Link::unclassified("https://a", "A").classified(Category::SillyStuff);
    let (state, effects) = update(
        AppState::new(),
        Msg::LinkSaved {
            origin: alice(),
            link,
            result: Err(StoreFailure::NotFound),
        },
    );
    let reply = only_reply(effects);
    assert!(reply.text.contains("new collection <name>"));
    assert_eq!(reply.keyboard, Some(Category::names()));
    assert_eq!(
        state.pending_link(alice().user_id),
        Some(&Link::unclassified("https://a", "A"))
    );

    let (_, effects) = say(state, alice(), "Libs & Demos");
    assert!(matches!(effects.as_slice(), [Effect::AppendLink { .. }]));
}

#[test]
fn pending_links_are_per_user() {
    init_logging();
    let bob = Origin::new(8, 80);
    let (state, _) = fetched(AppState::new(), alice(), "https://a", "A");
    let (state, effects) = say(state, bob, "Releases");

    assert!(matches!(effects.as_slice(), [Effect::Reply(_)]));
    assert!(state.pending_link(alice().user_id).is_some());
    assert!(state.pending_link(UserId(8)).is_none());
}

#[test]
fn render_replies_use_mode_specific_format() {
    init_logging();
    let mut collection = Collection::new(alice().user_id, "Reading List");
    collection
        .links
        .push(Link::unclassified("https://example.com/a", "Hello World").classified(Category::ArticlesAndNews));

    let (state, effects) = say(AppState::new(), alice(), "generate markdown");
    assert_eq!(
        effects,
        vec![Effect::LoadCollection {
            origin: alice(),
            mode: linkbot_core::RenderMode::Markdown,
        }]
    );

    let (state, effects) = update(
        state,
        Msg::CollectionLoaded {
            origin: alice(),
            mode: linkbot_core::RenderMode::Markdown,
            result: Ok(collection.clone()),
        },
    );
    let reply = only_reply(effects);
    assert_eq!(reply.format, ReplyFormat::NoPreview);
    assert!(reply
        .text
        .contains("## Articles & News\n- [Hello World](https://example.com/a)\n"));

    let (_, effects) = update(
        state,
        Msg::CollectionLoaded {
            origin: alice(),
            mode: linkbot_core::RenderMode::Preview,
            result: Ok(collection),
        },
    );
    let preview = only_reply(effects);
    assert_eq!(preview.format, ReplyFormat::MarkdownNoPreview);
    assert_eq!(preview.text, reply.text);
}

#[test]
fn render_without_collection_is_a_handled_error() {
    init_logging();
    let (_, effects) = update(
        AppState::new(),
        Msg::CollectionLoaded {
            origin: alice(),
            mode: linkbot_core::RenderMode::Preview,
            result: Err(StoreFailure::NotFound),
        },
    );
    assert!(only_reply(effects).text.starts_with("You have no collection yet."));
}

#[test]
fn long_documents_are_split_across_replies() {
    init_logging();
    let mut collection = Collection::new(alice().user_id, "Big");
    for i in 0..200 {
        collection.links.push(
            Link::unclassified(format!("https://example.com/{i}"), format!("Title number {i}"))
                .classified(Category::Releases),
        );
    }
    let (_, effects) = update(
        AppState::new(),
        Msg::CollectionLoaded {
            origin: alice(),
            mode: linkbot_core::RenderMode::Markdown,
            result: Ok(collection),
        },
    );
    assert!(effects.len() > 1);
    for effect in &effects {
        match effect {
            Effect::Reply(reply) => assert!(reply.text.len() <= linkbot_core::MAX_REPLY_LEN),
            other => panic!("unexpected effect {other:?}"),
        }
    }
}

#[test]
fn unrecognized_text_gets_a_hint() {
    init_logging();
    let (state, effects) = say(AppState::new(), alice(), "hello there");
    assert!(only_reply(effects).text.contains("generate markdown"));
    assert_eq!(state, AppState::new());
}
