use leptos::prelude::*;
use topic_graph::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(|| {
		view! { <App /> }
	})
}
