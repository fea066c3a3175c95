//! Display control module for PineTime
//!
//! The face is split into fixed text regions; each update clears one region and redraws its
//! text centered inside it.

use embassy_nrf::{
    gpio::Output,
    peripherals::{P0_18, P0_25, P0_26, SPI2},
    spim::Spim,
};

use display_interface_spi::SPIInterface;
use embassy_time::Delay;
use embedded_graphics::{
    mono_font::{iso_8859_1::FONT_10X20, MonoFont, MonoTextStyle},
    pixelcolor::Rgb565,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use mipidsi::{models::ST7789, Builder, Orientation};
use profont::PROFONT_24_POINT;

use worldclock_watchface::Region;

const LCD_W: u16 = 240;
const LCD_H: u16 = 240;

/// Height of the status bar holding the glyphs and the second clock
const BAR_H: u32 = 50;

const BAR_BACKGROUND: Rgb565 = Rgb565::new(0, 25, 0);
const BAR_FOREGROUND: Rgb565 = Rgb565::WHITE;
const BACKGROUND: Rgb565 = Rgb565::WHITE;
const FOREGROUND: Rgb565 = Rgb565::BLACK;

type Lcd<'a> = mipidsi::Display<
    SPIInterface<Spim<'a, SPI2>, Output<'a, P0_18>, Output<'a, P0_25>>,
    ST7789,
    Output<'a, P0_26>,
>;


/// Placement and style of one region
struct Layout {
    bounds: Rectangle,
    font: &'static MonoFont<'static>,
    foreground: Rgb565,
    background: Rgb565,
}

fn layout(region: Region) -> Layout {
    let bar = |x: i32, w: u32, font| Layout {
        bounds: Rectangle::new(Point::new(x, 0), Size::new(w, BAR_H)),
        font,
        foreground: BAR_FOREGROUND,
        background: BAR_BACKGROUND,
    };
    let body = |y: i32, h: u32, font| Layout {
        bounds: Rectangle::new(Point::new(0, y), Size::new(LCD_W as u32, h)),
        font,
        foreground: FOREGROUND,
        background: BACKGROUND,
    };

    match region {
        Region::Bluetooth => bar(0, 32, &FONT_10X20),
        Region::OtherTime => bar(32, 176, &PROFONT_24_POINT),
        Region::Battery => bar(208, 32, &FONT_10X20),
        Region::LocalTime => body(70, 70, &PROFONT_24_POINT),
        Region::Date => body(150, 40, &FONT_10X20),
        Region::Weather => body(195, 45, &FONT_10X20),
    }
}

pub struct Display<'a> {
    lcd: Lcd<'a>,
}

impl<'a> Display<'a> {
    /// Initialize the display and draw the empty face
    pub fn init(
        spim: Spim<'a, SPI2>,
        cs: Output<'a, P0_25>,
        dc: Output<'a, P0_18>,
        rst: Output<'a, P0_26>,
        delay: &mut Delay,
    ) -> Result<Self, Error> {
        let lcd = Builder::st7789(SPIInterface::new(spim, dc, cs))
            .with_display_size(LCD_W, LCD_H)
            .with_orientation(Orientation::Portrait(false))
            .init(delay, Some(rst))
            .map_err(|_| Error::Init)?;

        let mut display = Self { lcd };
        display.draw_background()?;
        Ok(display)
    }

    /// Replace the text of one region
    pub fn draw_region(&mut self, region: Region, text: &str) -> Result<(), Error> {
        let layout = layout(region);

        layout
            .bounds
            .into_styled(PrimitiveStyle::with_fill(layout.background))
            .draw(&mut self.lcd)
            .map_err(|_| Error::Draw)?;

        let character_style = MonoTextStyle::new(layout.font, layout.foreground);
        let text_style = TextStyleBuilder::new()
            .alignment(Alignment::Center)
            .baseline(Baseline::Middle)
            .build();
        Text::with_text_style(text, layout.bounds.center(), character_style, text_style)
            .draw(&mut self.lcd)
            .map_err(|_| Error::Draw)?;

        Ok(())
    }

    fn draw_background(&mut self) -> Result<(), Error> {
        self.lcd.clear(BACKGROUND).map_err(|_| Error::Draw)?;
        Rectangle::new(Point::zero(), Size::new(LCD_W as u32, BAR_H))
            .into_styled(PrimitiveStyle::with_fill(BAR_BACKGROUND))
            .draw(&mut self.lcd)
            .map_err(|_| Error::Draw)?;
        // Separator under the status bar
        Line::new(
            Point::new(0, BAR_H as i32 + 2),
            Point::new(LCD_W as i32 - 1, BAR_H as i32 + 2),
        )
        .into_styled(PrimitiveStyle::with_stroke(FOREGROUND, 1))
        .draw(&mut self.lcd)
        .map_err(|_| Error::Draw)?;
        Ok(())
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    Init,
    Draw,
}
