use leptos::ev::SubmitEvent;
use leptos::prelude::*;

/// Topic input with a submit button that stays disabled while `busy`.
#[component]
pub fn TopicForm(
	#[prop(into)] busy: Signal<bool>,
	#[prop(into)] on_submit: Callback<String>,
) -> impl IntoView {
	let text = RwSignal::new(String::new());

	let submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		if busy.get_untracked() {
			return;
		}
		on_submit.run(text.get_untracked());
	};

	view! {
		<form class="topic-form" on:submit=submit>
			<input
				type="text"
				class="topic-input"
				placeholder="Enter a research topic, e.g. \"protein folding\""
				prop:value=move || text.get()
				on:input=move |ev| text.set(event_target_value(&ev))
			/>
			<button
				type="submit"
				class="topic-submit"
				disabled=move || busy.get() || text.with(|t| t.trim().is_empty())
			>
				{move || if busy.get() { "Generating…" } else { "Generate graph" }}
			</button>
		</form>
	}
}
