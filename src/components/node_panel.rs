use std::sync::Arc;

use leptos::prelude::*;

use crate::research::GraphData;

/// Side panel mirroring the current selection, plus the related-node list.
#[component]
pub fn NodePanel(
	#[prop(into)] graph: Signal<Option<Arc<GraphData>>>,
	#[prop(into)] selected: Signal<Option<String>>,
	#[prop(into)] on_select: Callback<Option<String>>,
) -> impl IntoView {
	let details = move || {
		let graph = graph.get();
		let node = selected.with(|id| {
			let id = id.as_deref()?;
			graph.as_ref()?.node(id).cloned()
		});
		match node {
			Some(node) => view! {
				<div class="node-details">
					<h2>{node.label}</h2>
					<p>
						{node
							.description
							.unwrap_or_else(|| "No description available.".to_owned())}
					</p>
				</div>
			}
			.into_any(),
			None => view! {
				<p class="node-hint">"Click a node in the graph to see its details."</p>
			}
			.into_any(),
		}
	};

	let related = move || {
		let Some(graph) = graph.get() else {
			return Vec::new();
		};
		let topic_id = graph.topic_node().map(|n| n.id.clone()).unwrap_or_default();
		graph
			.related_nodes()
			.map(|node| {
				let id = node.id.clone();
				let relation = graph
					.relation_between(&topic_id, &node.id)
					.map(str::to_owned);
				let is_selected = {
					let id = id.clone();
					move || selected.with(|s| s.as_deref() == Some(id.as_str()))
				};
				view! {
					<li>
						<button
							class="related-node"
							class:selected=is_selected
							on:click=move |_| on_select.run(Some(id.clone()))
						>
							<span class="related-name">{node.label.clone()}</span>
							{relation.map(|r| view! { <span class="related-relation">{r}</span> })}
						</button>
					</li>
				}
			})
			.collect::<Vec<_>>()
	};

	let has_related = move || {
		graph.with(|g| {
			g.as_ref()
				.is_some_and(|g| g.related_nodes().next().is_some())
		})
	};

	view! {
		<aside class="node-panel">
			{details}
			<Show when=has_related>
				<h3>"Related concepts"</h3>
				<ul class="related-list">{related}</ul>
			</Show>
		</aside>
	}
}
