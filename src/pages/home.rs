use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info, warn};

use crate::components::force_graph::{ForceGraphCanvas, RenderGraph};
use crate::components::node_panel::NodePanel;
use crate::components::topic_form::TopicForm;
use crate::config::ApiConfig;
use crate::research::{GeminiClient, GraphData, ResearchSession, Status, generate_graph};

/// Current graph compared by identity, so the render model is only rebuilt
/// when a new generation lands.
#[derive(Clone, Default)]
struct CurrentGraph(Option<Arc<GraphData>>);

impl PartialEq for CurrentGraph {
	fn eq(&self, other: &Self) -> bool {
		match (&self.0, &other.0) {
			(Some(a), Some(b)) => Arc::ptr_eq(a, b),
			(None, None) => true,
			_ => false,
		}
	}
}

/// Topic input, graph canvas and details panel.
#[component]
pub fn Home() -> impl IntoView {
	let client = GeminiClient::new(ApiConfig::from_build_env());
	if !client.config().has_key() {
		warn!("no API key configured; generation requests will fail until one is set");
	}

	let session = RwSignal::new(ResearchSession::new());
	let current = Memo::new(move |_| CurrentGraph(session.with(|s| s.graph().cloned())));
	let render_graph = Memo::new(move |_| {
		current.with(|c| c.0.as_deref().map(RenderGraph::from).unwrap_or_default())
	});
	let graph = Signal::derive(move || current.with(|c| c.0.clone()));
	let selected = Signal::derive(move || session.with(|s| s.selected().map(str::to_owned)));
	let busy = Signal::derive(move || session.with(ResearchSession::is_loading));

	let on_select = Callback::new(move |id: Option<String>| {
		session.update(|s| s.apply_selection(id.as_deref()));
	});

	let on_submit = Callback::new(move |input: String| {
		let mut topic = None;
		session.maybe_update(|s| {
			topic = s.begin(&input);
			topic.is_some()
		});
		let Some(topic) = topic else {
			return;
		};
		info!("generating graph for {:?}", topic.as_str());
		let client = client.clone();
		spawn_local(async move {
			let result = generate_graph(&client, &topic).await;
			if let Err(err) = &result {
				error!("generation for {:?} failed: {err}", topic.as_str());
			}
			session.update(|s| s.finish(result));
		});
	});

	let status = move || {
		session.with(|s| match s.status() {
			Status::Idle if s.graph().is_none() => {
				let hint = "Enter a topic to map its related concepts.";
				Some(view! { <p class="status">{hint}</p> }.into_any())
			}
			Status::Idle => None,
			Status::Loading(topic) => {
				let text = format!("Generating a graph for \u{201c}{topic}\u{201d}…");
				Some(view! { <p class="status loading">{text}</p> }.into_any())
			}
			Status::Failed(msg) => {
				let msg = msg.clone();
				Some(view! { <p class="status error" role="alert">{msg}</p> }.into_any())
			}
		})
	};

	view! {
		<div class="research-layout">
			<header class="research-header">
				<h1>"Topic Graph"</h1>
				<TopicForm busy=busy on_submit=on_submit />
				{status}
			</header>
			<main class="research-main">
				<div class="graph-container">
					<ForceGraphCanvas data=render_graph selected=selected on_select=on_select />
					<div class="graph-overlay">
						<p class="subtitle">
							"Click a node for details. Drag nodes to reposition. Scroll to zoom. Drag background to pan."
						</p>
					</div>
				</div>
				<NodePanel graph=graph selected=selected on_select=on_select />
			</main>
		</div>
	}
}
