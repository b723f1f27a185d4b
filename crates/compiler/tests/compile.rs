#![allow(unused_crate_dependencies)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pretty_assertions::assert_eq;
use trellis_compiler::{
	AttributeCompiler, AttributeKind, CompileError, Constructor, DocumentCompiler, ElementCompiler, ElementKind,
	Environment, MemoryFetcher, Namespace, Object, ReferenceKind, Registry, Schema, UnitState, Value, async_trait,
};
use trellis_markup::{Document, Element};
use url::Url;

fn kdl(source: &str) -> Document {
	Document::parse_kdl(source, Some(Url::parse("mem://game/scenes/").unwrap())).unwrap()
}

async fn compile(env: &Environment, document: Document) -> Arc<DocumentCompiler> {
	DocumentCompiler::new(env, document, None).process().await.unwrap()
}

#[tokio::test]
async fn container_children_survive_attribute_failure() {
	let env = Environment::default();
	let compiler = compile(
		&env,
		kdl(r#"
			container name="stage" {
				shape x=10
				shape visible="sometimes"
			}
		"#),
	)
	.await;

	let stage = compiler.result().unwrap();
	let stage = stage.as_object().unwrap();
	assert_eq!(stage.get("name"), Some(Value::from("stage")));
	assert_eq!(stage.child_count(), 2);

	let diagnostics = compiler.diagnostics();
	assert_eq!(diagnostics.len(), 1);
	assert_eq!(diagnostics[0].attribute.as_deref(), Some("visible"));
	assert_eq!(&*diagnostics[0].tag, "shape");
}

#[tokio::test]
async fn equal_attributes_share_one_compiler() {
	let env = Environment::default();
	let compiler = compile(&env, kdl("container { shape x=5; shape x=5 y=5; }")).await;

	let pass = compiler.pass();
	let x = pass.attribute("x", "5", "number", None).unwrap();
	assert_eq!(x.state(), UnitState::Succeeded);
	assert!(Arc::ptr_eq(&x, &pass.attribute("x", "5", " Number", None).unwrap()));
	assert!(!Arc::ptr_eq(&x, &pass.attribute("y", "5", "number", None).unwrap()));

	let children = compiler.result().unwrap().as_object().unwrap().children();
	assert_eq!(children[0].as_object().unwrap().get("x"), Some(Value::Float(5.0)));
	assert_eq!(children[1].as_object().unwrap().get("x"), Some(Value::Float(5.0)));
}

#[tokio::test]
async fn unregistered_root_tag_rejects_document() {
	let env = Environment::default();
	let compiler = DocumentCompiler::new(&env, kdl("stage { shape; }"), None);
	let err = compiler.process().await.unwrap_err();
	assert!(matches!(
		err,
		CompileError::UnresolvedReference { kind: ReferenceKind::Tag, ref name } if &**name == "stage"
	));
	assert!(compiler.result().is_none());
}

#[tokio::test]
async fn processing_twice_shares_the_outcome() {
	let env = Environment::default();
	let compiler = DocumentCompiler::new(&env, kdl("container { shape; }"), None);
	let first = compiler.process().await.unwrap();
	let second = compiler.process().await.unwrap();
	assert!(Arc::ptr_eq(&first, &second));

	let (a, b) = (first.result().unwrap(), second.result().unwrap());
	assert!(a.as_object().unwrap().ptr_eq(b.as_object().unwrap()));
}

#[tokio::test]
async fn bitmap_loads_relative_to_document_base() {
	let fetcher = MemoryFetcher::new().with(Url::parse("mem://game/art/hero.png").unwrap(), &b"png"[..]);
	let env = Environment::default().with_fetcher(Arc::new(fetcher));
	let compiler = compile(&env, kdl(r#"container { bitmap src="../art/hero.png"; bitmap src="missing.png"; }"#)).await;

	let children = compiler.result().unwrap().as_object().unwrap().children();
	let src = children[0].as_object().unwrap().get("src").unwrap();
	assert_eq!(src.as_resource().unwrap().url().as_str(), "mem://game/art/hero.png");
	assert!(!children[1].as_object().unwrap().has("src"));
	assert!(matches!(compiler.diagnostics()[0].error, CompileError::Fetch(_)));
}

#[tokio::test]
async fn controller_instance_comes_from_namespace() {
	let namespace = Namespace::new();
	namespace.define("game.HeroController", Constructor::object("game.HeroController", "hero-controller"), false);
	let env = Environment::default().with_namespace(Arc::new(namespace));
	let compiler = compile(&env, kdl(r#"shape controller="game.HeroController""#)).await;

	let shape = compiler.result().unwrap();
	let controller = shape.as_object().unwrap().get("controller").unwrap();
	assert_eq!(controller.as_object().unwrap().class(), "hero-controller");
}

#[tokio::test]
async fn serializes_the_compiled_graph() {
	let env = Environment::default();
	let compiler = compile(
		&env,
		kdl(r#"
			container name="hud" alpha=0.5 {
				shape x=1 y=2
				int value=7
			}
		"#),
	)
	.await;

	let json = serde_json::to_value(compiler.result().unwrap()).unwrap();
	assert_eq!(
		json,
		serde_json::json!({
			"class": "container",
			"properties": { "alpha": 0.5, "name": "hud" },
			"children": [{ "class": "shape", "properties": { "x": 1.0, "y": 2.0 } }]
		})
	);
}

/// Embedder-defined element kind that counts constructions.
#[derive(Default)]
struct Sprite {
	built: AtomicUsize,
}

#[async_trait]
impl ElementKind for Sprite {
	fn name(&self) -> &'static str {
		"sprite"
	}

	fn define(&self, _element: &Element, schema: &mut Schema) {
		schema.define("frames", "frames").define_attribute("speed", "float", false, true);
	}

	async fn construct(&self, compiler: &ElementCompiler) -> Result<Value, CompileError> {
		self.built.fetch_add(1, Ordering::SeqCst);
		let sprite = Object::new("sprite");
		sprite.set("speed", compiler.attribute_or("speed", 1.0));
		for child in compiler.child_results() {
			sprite.push_child(child);
		}
		Ok(sprite.into())
	}
}

/// Embedder-defined attribute kind: `a..b` frame ranges.
struct Frames;

#[async_trait]
impl AttributeKind for Frames {
	fn name(&self) -> &'static str {
		"frames"
	}

	async fn construct(&self, attr: &AttributeCompiler) -> Result<Value, CompileError> {
		let (from, to) = attr.value().split_once("..").ok_or_else(|| CompileError::message("expected a..b"))?;
		let parse = |s: &str| s.trim().parse::<i64>().map_err(|e| CompileError::message(e.to_string()));
		Ok(Value::List((parse(from)?..=parse(to)?).map(Value::Int).collect()))
	}
}

#[tokio::test]
async fn embedder_kinds_extend_the_registry() {
	let registry = Registry::with_builtins();
	let sprite = Arc::new(Sprite::default());
	registry.associate_element(sprite.clone(), &["sprite"]);
	registry.associate_attribute(Arc::new(Frames), &["frames"]);
	let env = Environment::new(Arc::new(registry));

	let compiler = compile(&env, kdl(r#"sprite frames="1..3" speed=2 { sprite frames="x"; }"#)).await;
	let outer = compiler.result().unwrap();
	let outer = outer.as_object().unwrap();

	assert_eq!(outer.get("frames"), Some(Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])));
	assert_eq!(outer.get("speed"), Some(Value::Float(2.0)));

	let inner = outer.children()[0].clone();
	let inner = inner.as_object().unwrap();
	assert_eq!(inner.get("speed"), Some(Value::Float(2.0)));
	assert!(!inner.has("frames"));
	assert_eq!(sprite.built.load(Ordering::SeqCst), 2);
	assert!(matches!(compiler.diagnostics()[0].error, CompileError::Message(_)));
}

#[tokio::test]
async fn passes_do_not_share_compilers() {
	let env = Environment::default();
	let document = kdl("container { shape; }");
	let a = compile(&env, document.clone()).await;
	let b = compile(&env, document.clone()).await;

	let node = document.root();
	assert!(!Arc::ptr_eq(&a.element(node).unwrap(), &b.element(node).unwrap()));
	assert_eq!(a.result(), b.result());
}
