use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::{Point, Viewport};

/// Index of a bitmap created through a [`Renderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BitmapHandle(pub usize);

/// Index of a sprite created through a [`Renderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub usize);

/// Index of a text created through a [`Renderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextHandle(pub usize);

/// A stroked, filled circle that sprites are stamped with.
#[derive(Clone, Debug, PartialEq)]
pub struct CircleBitmap {
	pub color: String,
	pub radius: f64,
	pub stroke_color: String,
	pub stroke_width: f64,
}

/// How a label is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
	pub font_size: f64,
	pub font: String,
	pub weight: String,
	pub color: String,
	pub stroke_color: String,
	pub stroke_thickness: f64,
	/// Fraction of the text box that sits on the position, per axis.
	pub anchor: Point,
}

/// Stroke for edge lines; `alpha` is the global opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
	pub width: f64,
	pub color: String,
	pub alpha: f64,
}

/// Drawing primitives the scene is built from.
///
/// Sprites and texts are retained and moved by handle; lines are immediate
/// and live until the next [`clear_lines`](Renderer::clear_lines).
pub trait Renderer {
	fn create_circle_bitmap(
		&mut self,
		color: &str,
		radius: f64,
		stroke_color: &str,
		stroke_width: f64,
	) -> BitmapHandle;
	fn create_sprite(&mut self, position: Point, bitmap: BitmapHandle) -> SpriteHandle;
	fn create_text(&mut self, position: Point, text: &str, style: TextStyle) -> TextHandle;
	fn set_sprite_position(&mut self, sprite: SpriteHandle, position: Point);
	fn set_text_position(&mut self, text: TextHandle, position: Point);
	fn clear_lines(&mut self);
	fn draw_line(&mut self, from: Point, to: Point, style: &LineStyle);
}

/// A bitmap stamped at a position, centered.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
	pub position: Point,
	pub bitmap: BitmapHandle,
}

/// A retained label.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
	pub position: Point,
	pub text: String,
	pub style: TextStyle,
}

/// A segment drawn since the last [`Renderer::clear_lines`].
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
	pub from: Point,
	pub to: Point,
	pub style: LineStyle,
}

/// Retained scene painted onto a canvas each frame.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
	/// Fill painted before anything else.
	pub background: String,
	bitmaps: Vec<CircleBitmap>,
	sprites: Vec<Sprite>,
	texts: Vec<Text>,
	lines: Vec<Line>,
}

impl DisplayList {
	/// An empty list over `background`.
	pub fn new(background: impl Into<String>) -> Self {
		Self {
			background: background.into(),
			..Self::default()
		}
	}

	pub fn bitmap(&self, handle: BitmapHandle) -> &CircleBitmap {
		&self.bitmaps[handle.0]
	}

	pub fn sprite(&self, handle: SpriteHandle) -> &Sprite {
		&self.sprites[handle.0]
	}

	pub fn text(&self, handle: TextHandle) -> &Text {
		&self.texts[handle.0]
	}

	/// Bitmaps in creation order; likewise for the accessors below.
	pub fn bitmaps(&self) -> &[CircleBitmap] {
		&self.bitmaps
	}

	pub fn sprites(&self) -> &[Sprite] {
		&self.sprites
	}

	pub fn texts(&self) -> &[Text] {
		&self.texts
	}

	pub fn lines(&self) -> &[Line] {
		&self.lines
	}
}

impl Renderer for DisplayList {
	fn create_circle_bitmap(
		&mut self,
		color: &str,
		radius: f64,
		stroke_color: &str,
		stroke_width: f64,
	) -> BitmapHandle {
		self.bitmaps.push(CircleBitmap {
			color: color.to_owned(),
			radius,
			stroke_color: stroke_color.to_owned(),
			stroke_width,
		});
		BitmapHandle(self.bitmaps.len() - 1)
	}

	fn create_sprite(&mut self, position: Point, bitmap: BitmapHandle) -> SpriteHandle {
		self.sprites.push(Sprite { position, bitmap });
		SpriteHandle(self.sprites.len() - 1)
	}

	fn create_text(&mut self, position: Point, text: &str, style: TextStyle) -> TextHandle {
		self.texts.push(Text {
			position,
			text: text.to_owned(),
			style,
		});
		TextHandle(self.texts.len() - 1)
	}

	fn set_sprite_position(&mut self, sprite: SpriteHandle, position: Point) {
		self.sprites[sprite.0].position = position;
	}

	fn set_text_position(&mut self, text: TextHandle, position: Point) {
		self.texts[text.0].position = position;
	}

	fn clear_lines(&mut self) {
		self.lines.clear();
	}

	fn draw_line(&mut self, from: Point, to: Point, style: &LineStyle) {
		self.lines.push(Line {
			from,
			to,
			style: style.clone(),
		});
	}
}

/// Paints lines, then sprites, then labels in creation order.
pub fn paint(list: &DisplayList, ctx: &CanvasRenderingContext2d, viewport: &Viewport) {
	ctx.set_fill_style_str(&list.background);
	ctx.fill_rect(0.0, 0.0, viewport.width(), viewport.height());
	draw_lines(list, ctx);
	draw_sprites(list, ctx);
	draw_texts(list, ctx);
}

fn draw_lines(list: &DisplayList, ctx: &CanvasRenderingContext2d) {
	for line in &list.lines {
		ctx.set_global_alpha(line.style.alpha);
		ctx.set_stroke_style_str(&line.style.color);
		ctx.set_line_width(line.style.width);
		ctx.begin_path();
		ctx.move_to(line.from.x, line.from.y);
		ctx.line_to(line.to.x, line.to.y);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_sprites(list: &DisplayList, ctx: &CanvasRenderingContext2d) {
	for sprite in &list.sprites {
		let bmp = &list.bitmaps[sprite.bitmap.0];
		let (x, y) = (sprite.position.x, sprite.position.y);
		ctx.begin_path();
		let _ = ctx.arc(x, y, (bmp.radius - bmp.stroke_width).max(0.0), 0.0, 2.0 * PI);
		ctx.close_path();
		ctx.set_fill_style_str(&bmp.color);
		ctx.fill();
		ctx.set_line_width(bmp.stroke_width);
		ctx.set_stroke_style_str(&bmp.stroke_color);
		ctx.stroke();
	}
}

fn draw_texts(list: &DisplayList, ctx: &CanvasRenderingContext2d) {
	ctx.set_text_baseline("top");
	ctx.set_text_align("left");
	for text in &list.texts {
		let style = &text.style;
		ctx.set_font(&format!("{} {}px {}", style.weight, style.font_size, style.font));
		let width = ctx
			.measure_text(&text.text)
			.map(|m| m.width())
			.unwrap_or_default();
		let (x, y) = (
			text.position.x - style.anchor.x * width,
			text.position.y - style.anchor.y * style.font_size,
		);
		if style.stroke_thickness > 0.0 {
			ctx.set_line_width(style.stroke_thickness);
			ctx.set_stroke_style_str(&style.stroke_color);
			let _ = ctx.stroke_text(&text.text, x, y);
		}
		ctx.set_fill_style_str(&style.color);
		let _ = ctx.fill_text(&text.text, x, y);
	}
}
